//! Class repository for Memwall.

use super::types::Class;
use crate::db::DbPool;
use crate::{Result, WallError};

/// Repository for class CRUD operations.
pub struct ClassRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ClassRepository<'a> {
    /// Create a new ClassRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new class.
    pub async fn create(&self, name: &str, full_name: &str) -> Result<Class> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO classes (name, full_name) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(full_name)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| WallError::NotFound("class".to_string()))
    }

    /// Get a class by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT id, name, full_name, created_at FROM classes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(class)
    }

    /// Get a class by its unique full name.
    pub async fn get_by_full_name(&self, full_name: &str) -> Result<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(
            "SELECT id, name, full_name, created_at FROM classes WHERE full_name = $1",
        )
        .bind(full_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(class)
    }

    /// List all classes, newest first.
    pub async fn list(&self) -> Result<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT id, name, full_name, created_at FROM classes
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(classes)
    }
}
