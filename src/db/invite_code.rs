//! Invite code repository.
//!
//! Invite codes are single-use tokens gating registration. Each code is
//! attributed to a creator (a user, or the system when `created_by` is
//! NULL) and, once redeemed, to its consumer. Codes transition
//! unused -> used exactly once and are never deleted.

use super::{DbPool, DbTransaction};
use crate::Result;

#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(feature = "postgres")]
const SQL_NOW: &str = "TO_CHAR(NOW(), 'YYYY-MM-DD HH24:MI:SS')";

const CODE_COLUMNS: &str = "id, code, created_by, used_by, created_at, used_at";

/// Invite code entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InviteCode {
    /// Code ID.
    pub id: i64,
    /// The token itself, stored uppercase.
    pub code: String,
    /// Creating user, NULL for system-generated codes.
    pub created_by: Option<i64>,
    /// Consuming user (None until redeemed).
    pub used_by: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Redemption timestamp (None if unused).
    pub used_at: Option<String>,
}

impl InviteCode {
    /// Check if the code has been redeemed.
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Check if this is a system-generated code.
    pub fn is_system(&self) -> bool {
        self.created_by.is_none()
    }
}

/// An invite code row joined with its consumer's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InviteCodeDetail {
    /// The token.
    pub code: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Redemption timestamp (None if unused).
    pub used_at: Option<String>,
    /// Username of the consumer, if redeemed.
    pub used_by_name: Option<String>,
}

/// New invite code for creation.
pub struct NewInviteCode {
    /// The token (will be stored uppercase).
    pub code: String,
    /// Creating user, None for system codes.
    pub created_by: Option<i64>,
}

/// Repository for invite code operations.
///
/// Codes are matched case-insensitively: they are stored uppercase and
/// every lookup normalizes its input the same way.
pub struct InviteCodeRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> InviteCodeRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new invite code.
    pub async fn create(&self, new_code: &NewInviteCode) -> Result<InviteCode> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO invite_codes (code, created_by) VALUES ($1, $2) RETURNING id",
        )
        .bind(new_code.code.to_uppercase())
        .bind(new_code.created_by)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| crate::WallError::NotFound("invite code".to_string()))
    }

    /// Persist a new invite code within an open transaction.
    pub async fn create_in_tx(tx: &mut DbTransaction<'_>, new_code: &NewInviteCode) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO invite_codes (code, created_by) VALUES ($1, $2) RETURNING id",
        )
        .bind(new_code.code.to_uppercase())
        .bind(new_code.created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    /// Get an invite code by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<InviteCode>> {
        let code = sqlx::query_as::<_, InviteCode>(&format!(
            "SELECT {CODE_COLUMNS} FROM invite_codes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(code)
    }

    /// Look up a code case-insensitively.
    ///
    /// Read-only: suitable for pre-validating a registration form without
    /// consuming the code.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<InviteCode>> {
        let result = sqlx::query_as::<_, InviteCode>(&format!(
            "SELECT {CODE_COLUMNS} FROM invite_codes WHERE code = $1"
        ))
        .bind(code.to_uppercase())
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Check whether a token already exists (used during generation).
    pub async fn code_exists(&self, code: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invite_codes WHERE code = $1)")
                .bind(code.to_uppercase())
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Atomically redeem an unused code for the given user.
    ///
    /// Returns the consumed code, or None if it does not exist or was
    /// already used. The conditional UPDATE guarantees that two
    /// registrations racing on the same code cannot both succeed: the
    /// statement matches only while `used_at IS NULL`, so exactly one
    /// writer wins and the loser sees no row.
    pub async fn consume(&self, code: &str, used_by: i64) -> Result<Option<InviteCode>> {
        let sql = format!(
            "UPDATE invite_codes
             SET used_at = {SQL_NOW}, used_by = $2
             WHERE code = $1 AND used_at IS NULL
             RETURNING {CODE_COLUMNS}"
        );

        let result = sqlx::query_as::<_, InviteCode>(&sql)
            .bind(code.to_uppercase())
            .bind(used_by)
            .fetch_optional(self.pool)
            .await?;

        Ok(result)
    }

    /// Atomically redeem an unused code within an open transaction.
    pub async fn consume_in_tx(
        tx: &mut DbTransaction<'_>,
        code: &str,
        used_by: i64,
    ) -> Result<Option<InviteCode>> {
        let sql = format!(
            "UPDATE invite_codes
             SET used_at = {SQL_NOW}, used_by = $2
             WHERE code = $1 AND used_at IS NULL
             RETURNING {CODE_COLUMNS}"
        );

        let result = sqlx::query_as::<_, InviteCode>(&sql)
            .bind(code.to_uppercase())
            .bind(used_by)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(result)
    }

    /// List codes created by a user, newest first.
    pub async fn list_by_creator(&self, user_id: i64) -> Result<Vec<InviteCode>> {
        let codes = sqlx::query_as::<_, InviteCode>(&format!(
            "SELECT {CODE_COLUMNS} FROM invite_codes
             WHERE created_by = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(codes)
    }

    /// List system-generated codes, newest first.
    pub async fn list_system(&self) -> Result<Vec<InviteCode>> {
        let codes = sqlx::query_as::<_, InviteCode>(&format!(
            "SELECT {CODE_COLUMNS} FROM invite_codes
             WHERE created_by IS NULL ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(codes)
    }

    /// List codes created by a user with their consumers' names, newest
    /// first.
    pub async fn list_by_creator_detailed(&self, user_id: i64) -> Result<Vec<InviteCodeDetail>> {
        let codes = sqlx::query_as::<_, InviteCodeDetail>(
            "SELECT c.code, c.created_at, c.used_at, u.username AS used_by_name
             FROM invite_codes c
             LEFT JOIN users u ON c.used_by = u.id
             WHERE c.created_by = $1
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(codes)
    }

    /// Count unused codes created by a user.
    pub async fn count_unused_by_creator(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invite_codes WHERE created_by = $1 AND used_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
            .bind("testuser")
            .bind("hashedpassword")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_stores_uppercase() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        let code = repo
            .create(&NewInviteCode {
                code: "abc123".to_string(),
                created_by: Some(1),
            })
            .await
            .unwrap();

        assert_eq!(code.code, "ABC123");
        assert_eq!(code.created_by, Some(1));
        assert!(!code.is_used());
        assert!(!code.is_system());
    }

    #[tokio::test]
    async fn test_get_by_code_case_insensitive() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        repo.create(&NewInviteCode {
            code: "ABC123".to_string(),
            created_by: None,
        })
        .await
        .unwrap();

        assert!(repo.get_by_code("abc123").await.unwrap().is_some());
        assert!(repo.get_by_code("Abc123").await.unwrap().is_some());
        assert!(repo.get_by_code("XYZ999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consume_once() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        repo.create(&NewInviteCode {
            code: "ONCE42".to_string(),
            created_by: None,
        })
        .await
        .unwrap();

        // First consume succeeds
        let consumed = repo.consume("once42", 1).await.unwrap();
        assert!(consumed.is_some());
        let consumed = consumed.unwrap();
        assert_eq!(consumed.used_by, Some(1));
        assert!(consumed.is_used());

        // Second consume finds no matching row
        let second = repo.consume("ONCE42", 1).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_consume_unknown_code() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        assert!(repo.consume("NOSUCH", 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consumer_is_immutable() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
            .bind("other")
            .bind("hash")
            .execute(db.pool())
            .await
            .unwrap();

        repo.create(&NewInviteCode {
            code: "KEEP01".to_string(),
            created_by: None,
        })
        .await
        .unwrap();

        repo.consume("KEEP01", 1).await.unwrap().unwrap();
        // A later attempt by another user cannot rebind the consumer
        assert!(repo.consume("KEEP01", 2).await.unwrap().is_none());

        let code = repo.get_by_code("KEEP01").await.unwrap().unwrap();
        assert_eq!(code.used_by, Some(1));
    }

    #[tokio::test]
    async fn test_list_by_creator_and_system() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        for code in ["AAA111", "BBB222"] {
            repo.create(&NewInviteCode {
                code: code.to_string(),
                created_by: Some(1),
            })
            .await
            .unwrap();
        }
        repo.create(&NewInviteCode {
            code: "SYS001".to_string(),
            created_by: None,
        })
        .await
        .unwrap();

        let mine = repo.list_by_creator(1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.created_by == Some(1)));

        let system = repo.list_system().await.unwrap();
        assert_eq!(system.len(), 1);
        assert!(system[0].is_system());
    }

    #[tokio::test]
    async fn test_list_by_creator_detailed_includes_consumer_name() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
            .bind("redeemer")
            .bind("hash")
            .execute(db.pool())
            .await
            .unwrap();

        repo.create(&NewInviteCode {
            code: "DET001".to_string(),
            created_by: Some(1),
        })
        .await
        .unwrap();
        repo.create(&NewInviteCode {
            code: "DET002".to_string(),
            created_by: Some(1),
        })
        .await
        .unwrap();
        repo.consume("DET001", 2).await.unwrap();

        let detailed = repo.list_by_creator_detailed(1).await.unwrap();
        assert_eq!(detailed.len(), 2);

        let used = detailed.iter().find(|c| c.code == "DET001").unwrap();
        assert!(used.used_at.is_some());
        assert_eq!(used.used_by_name.as_deref(), Some("redeemer"));

        let unused = detailed.iter().find(|c| c.code == "DET002").unwrap();
        assert!(unused.used_at.is_none());
        assert!(unused.used_by_name.is_none());
    }

    #[tokio::test]
    async fn test_count_unused_by_creator() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        for code in ["CNT001", "CNT002", "CNT003"] {
            repo.create(&NewInviteCode {
                code: code.to_string(),
                created_by: Some(1),
            })
            .await
            .unwrap();
        }
        repo.consume("CNT001", 1).await.unwrap();

        assert_eq!(repo.count_unused_by_creator(1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = setup_db().await;
        let repo = InviteCodeRepository::new(db.pool());

        repo.create(&NewInviteCode {
            code: "DUP001".to_string(),
            created_by: None,
        })
        .await
        .unwrap();

        let result = repo
            .create(&NewInviteCode {
                code: "dup001".to_string(),
                created_by: None,
            })
            .await;
        assert!(result.is_err());
    }
}
