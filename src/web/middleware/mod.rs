//! Middleware for the Memwall API.

pub mod auth;
pub mod cors;

pub use auth::{resolve_identity, AdminUser, CurrentUser};
pub use cors::create_cors_layer;
