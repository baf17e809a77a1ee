//! User repository for Memwall.
//!
//! This module provides CRUD operations for users in the database.

use super::user::{NewUser, User};
use super::{DbPool, DbTransaction};
use crate::{Result, WallError};

const USER_COLUMNS: &str = "id, username, password, campus, school_type, graduation_year, \
                            class_name, is_admin, invited_by, created_at";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, campus, school_type, graduation_year, class_name, invited_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.campus)
        .bind(&new_user.school_type)
        .bind(&new_user.graduation_year)
        .bind(&new_user.class_name)
        .bind(new_user.invited_by)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| WallError::NotFound("user".to_string()))
    }

    /// Create a new user within an open transaction.
    ///
    /// Used by the registration flow, which must insert the user, consume
    /// the invite code, and grant new codes atomically.
    pub async fn create_in_tx(tx: &mut DbTransaction<'_>, new_user: &NewUser) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, campus, school_type, graduation_year, class_name, invited_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(&new_user.campus)
        .bind(&new_user.school_type)
        .bind(&new_user.graduation_year)
        .bind(&new_user.class_name)
        .bind(new_user.invited_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(id)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a user by username (exact, case-sensitive match).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Check if a username is already taken (exact, case-sensitive match).
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Set or clear the admin flag for a user.
    ///
    /// Returns false if the user does not exist.
    pub async fn set_admin(&self, id: i64, is_admin: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_admin = $1 WHERE id = $2")
            .bind(is_admin)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all registered users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
