//! Memwall - A class memory wall.
//!
//! An invite-gated social bulletin board for graduating classes: members
//! register with single-use invite codes, open class halls, post
//! text+image memories, comment, like, and trade on a small second-hand
//! market.

pub mod auth;
pub mod board;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod market;
pub mod storage;
pub mod web;

pub use auth::{
    authenticate, can_modify_resource, create_session, destroy_session, hash_password, register,
    require_admin, require_authenticated, resolve, validate_password, verify_password, Identity,
    InviteError, PasswordError, PermissionError, RegistrationError, RegistrationRequest,
    ValidationError,
};
pub use config::Config;
pub use db::{Database, DbPool, NewUser, User, UserRepository};
pub use error::{Result, WallError};
pub use storage::ImageStore;
pub use web::WebServer;
