//! Session repository for cookie-based login sessions.
//!
//! Sessions bind an opaque client-held token to a user id with a fixed
//! absolute expiry. They are persisted so logins survive a process
//! restart; expired rows are swept opportunistically.

use super::DbPool;
use crate::Result;

#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(feature = "postgres")]
const SQL_NOW: &str = "TO_CHAR(NOW(), 'YYYY-MM-DD HH24:MI:SS')";

/// Session entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Session ID.
    pub id: i64,
    /// Opaque session token carried by the cookie.
    pub token: String,
    /// User ID.
    pub user_id: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Absolute expiry timestamp.
    pub expires_at: String,
}

/// New session for creation.
pub struct NewSession {
    /// User ID.
    pub user_id: i64,
    /// Opaque session token.
    pub token: String,
    /// Absolute expiry timestamp.
    pub expires_at: String,
}

/// Repository for session operations.
pub struct SessionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new session.
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sessions (user_id, token, expires_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_session.user_id)
        .bind(&new_session.token)
        .bind(&new_session.expires_at)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::WallError::NotFound("session".to_string()))
    }

    /// Get a session by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, token, user_id, created_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(session)
    }

    /// Get a valid (not expired) session by token.
    ///
    /// Expired and unknown tokens both yield None; the caller treats
    /// either as an anonymous request.
    pub async fn get_valid(&self, token: &str) -> Result<Option<Session>> {
        let sql = format!(
            "SELECT id, token, user_id, created_at, expires_at
             FROM sessions
             WHERE token = $1 AND expires_at > {SQL_NOW}"
        );
        let result = sqlx::query_as::<_, Session>(&sql)
            .bind(token)
            .fetch_optional(self.pool)
            .await?;

        Ok(result)
    }

    /// Delete a session by token.
    ///
    /// Idempotent: deleting an unknown or already-deleted token is not an
    /// error. Returns whether a row was removed.
    pub async fn destroy(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all sessions for a user.
    pub async fn destroy_all_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete expired sessions (cleanup).
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let sql = format!("DELETE FROM sessions WHERE expires_at < {SQL_NOW}");
        let result = sqlx::query(&sql).execute(self.pool).await?;

        Ok(result.rows_affected())
    }
}
