//! Request handlers for the Memwall API.

pub mod admin;
pub mod auth;
pub mod class;
pub mod invite;
pub mod market;
pub mod post;

use crate::config::Config;
use crate::storage::ImageStore;
use crate::Database;

/// Application state shared across handlers.
///
/// The sqlx pool inside [`Database`] is cheaply cloneable and handles its
/// own synchronization, so no further locking is needed here.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Image storage.
    pub images: ImageStore,
    /// Session cookie name.
    pub cookie_name: String,
    /// Session lifetime in days.
    pub session_expiry_days: i64,
    /// Invite codes granted per new user.
    pub codes_per_user: u32,
    /// Maximum codes per admin batch.
    pub admin_batch_max: u32,
    /// Cohort label for class full names.
    pub cohort: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create the application state from configuration.
    pub fn new(db: Database, images: ImageStore, config: &Config) -> Self {
        Self {
            db,
            images,
            cookie_name: config.session.cookie_name.clone(),
            session_expiry_days: config.session.expiry_days,
            codes_per_user: config.invites.codes_per_user,
            admin_batch_max: config.invites.admin_batch_max,
            cohort: config.site.cohort.clone(),
            max_upload_bytes: (config.uploads.max_upload_size_mb as usize) * 1024 * 1024,
        }
    }
}
