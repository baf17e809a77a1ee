//! Access control gates for Memwall.
//!
//! Pure predicates over a resolved identity. The routing layer resolves
//! identity once per request and uses these gates to short-circuit
//! unauthorized requests.

use thiserror::Error;

use crate::auth::session::Identity;
use crate::db::User;

/// Permission errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The request carries no authenticated identity.
    #[error("authentication required")]
    NotAuthenticated,

    /// The user lacks the admin flag.
    #[error("forbidden")]
    NotAdmin,
}

/// Require an authenticated identity.
pub fn require_authenticated(identity: &Identity) -> Result<&User, PermissionError> {
    identity.user().ok_or(PermissionError::NotAuthenticated)
}

/// Require an authenticated administrator.
///
/// An anonymous request fails with NotAuthenticated; an authenticated
/// non-admin fails with NotAdmin (rendered as a fixed "forbidden"
/// response by the web layer).
pub fn require_admin(identity: &Identity) -> Result<&User, PermissionError> {
    let user = require_authenticated(identity)?;
    if !user.is_admin {
        return Err(PermissionError::NotAdmin);
    }
    Ok(user)
}

/// Check whether a user may modify a resource owned by `owner_id`.
///
/// Owners and admins may modify.
pub fn can_modify_resource(user: &User, owner_id: i64) -> bool {
    user.id == owner_id || user.is_admin
}
