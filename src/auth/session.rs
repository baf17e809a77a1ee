//! Login sessions for Memwall.
//!
//! A session binds an opaque cookie token to a user id with a fixed
//! 30-day absolute expiry (configurable). Sessions are stored server-side
//! so they survive restarts; resolving an expired, unknown, or stale
//! token yields Anonymous rather than an error.

use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::verify_password;
use crate::datetime::days_from_now_string;
use crate::db::{DbPool, NewSession, Session, SessionRepository, User, UserRepository};
use crate::Result;

/// Identity resolved for a request.
///
/// Resolved once per request by the routing layer and passed explicitly
/// into handlers; there is no ambient current-user state.
#[derive(Debug, Clone)]
pub enum Identity {
    /// No valid session.
    Anonymous,
    /// A logged-in user.
    User(User),
}

impl Identity {
    /// Check if this identity is authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User(_))
    }

    /// Get the user, if authenticated.
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::User(user) => Some(user),
            Identity::Anonymous => None,
        }
    }
}

/// Verify a username/password pair.
///
/// Returns the user on success and `None` on any mismatch. A missing user
/// and a wrong password are deliberately indistinguishable so the
/// response cannot leak which half of the pair was wrong.
pub async fn authenticate(
    pool: &DbPool,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let users = UserRepository::new(pool);

    let user = match users.get_by_username(username).await? {
        Some(user) => user,
        None => {
            debug!(username = %username, "Login failed");
            return Ok(None);
        }
    };

    match verify_password(password, &user.password) {
        Ok(()) => Ok(Some(user)),
        Err(_) => {
            debug!(username = %username, "Login failed");
            Ok(None)
        }
    }
}

/// Create a session for a user.
///
/// Allocates an unguessable token with absolute expiry `expiry_days` from
/// now and persists it.
pub async fn create_session(pool: &DbPool, user_id: i64, expiry_days: i64) -> Result<Session> {
    let sessions = SessionRepository::new(pool);

    let session = sessions
        .create(&NewSession {
            user_id,
            token: Uuid::new_v4().to_string(),
            expires_at: days_from_now_string(expiry_days),
        })
        .await?;

    info!(user_id = user_id, "Session created");
    Ok(session)
}

/// Resolve a session token to an identity.
///
/// Unknown, expired, and stale (user no longer present) tokens all
/// resolve to Anonymous.
pub async fn resolve(pool: &DbPool, token: &str) -> Result<Identity> {
    let sessions = SessionRepository::new(pool);

    let session = match sessions.get_valid(token).await? {
        Some(session) => session,
        None => return Ok(Identity::Anonymous),
    };

    let users = UserRepository::new(pool);
    match users.get_by_id(session.user_id).await? {
        Some(user) => Ok(Identity::User(user)),
        None => Ok(Identity::Anonymous),
    }
}

/// Destroy a session.
///
/// Idempotent: destroying an unknown or already-destroyed token is a
/// no-op.
pub async fn destroy_session(pool: &DbPool, token: &str) -> Result<()> {
    let sessions = SessionRepository::new(pool);

    if sessions.destroy(token).await? {
        info!("Session destroyed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::db::NewUser;
    use crate::Database;

    async fn setup_user(db: &Database, username: &str, password: &str) -> User {
        let users = UserRepository::new(db.pool());
        users
            .create(&NewUser::new(username, hash_password(password).unwrap()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let db = Database::open_in_memory().await.unwrap();
        let created = setup_user(&db, "alice", "secret1").await;

        let user = authenticate(db.pool(), "alice", "secret1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_uniform() {
        let db = Database::open_in_memory().await.unwrap();
        setup_user(&db, "alice", "secret1").await;

        // Wrong password and unknown user produce the same None
        assert!(authenticate(db.pool(), "alice", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(db.pool(), "nobody", "secret1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        let user = setup_user(&db, "alice", "secret1").await;

        let session = create_session(db.pool(), user.id, 30).await.unwrap();

        let identity = resolve(db.pool(), &session.token).await.unwrap();
        assert!(identity.is_authenticated());
        assert_eq!(identity.user().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_anonymous() {
        let db = Database::open_in_memory().await.unwrap();

        let identity = resolve(db.pool(), "no-such-token").await.unwrap();
        assert!(!identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_destroy_then_resolve_is_anonymous() {
        let db = Database::open_in_memory().await.unwrap();
        let user = setup_user(&db, "alice", "secret1").await;

        let session = create_session(db.pool(), user.id, 30).await.unwrap();
        destroy_session(db.pool(), &session.token).await.unwrap();

        let identity = resolve(db.pool(), &session.token).await.unwrap();
        assert!(!identity.is_authenticated());

        // Destroying again is a no-op
        destroy_session(db.pool(), &session.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_multiple_logins_coexist() {
        let db = Database::open_in_memory().await.unwrap();
        let user = setup_user(&db, "alice", "secret1").await;

        let first = create_session(db.pool(), user.id, 30).await.unwrap();
        let second = create_session(db.pool(), user.id, 30).await.unwrap();
        assert_ne!(first.token, second.token);

        // Destroying one leaves the other intact
        destroy_session(db.pool(), &first.token).await.unwrap();
        assert!(resolve(db.pool(), &second.token)
            .await
            .unwrap()
            .is_authenticated());
    }

    #[tokio::test]
    async fn test_session_tokens_are_unguessable_shape() {
        let db = Database::open_in_memory().await.unwrap();
        let user = setup_user(&db, "alice", "secret1").await;

        let session = create_session(db.pool(), user.id, 30).await.unwrap();
        // UUID v4 text form
        assert_eq!(session.token.len(), 36);
        assert!(Uuid::parse_str(&session.token).is_ok());
    }
}
