//! Market listing repository for Memwall.

use super::types::{ItemStatus, MarketItem, NewMarketItem};
use crate::db::DbPool;
use crate::{Result, WallError};

const ITEM_COLUMNS: &str = "id, user_id, title, description, price, contact_info, image_url, \
                            status, view_count, created_at";

/// Repository for market listing operations.
pub struct MarketRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MarketRepository<'a> {
    /// Create a new MarketRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new listing.
    pub async fn create(&self, new_item: &NewMarketItem) -> Result<MarketItem> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO market_items (user_id, title, description, price, contact_info, image_url)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(new_item.user_id)
        .bind(&new_item.title)
        .bind(&new_item.description)
        .bind(&new_item.price)
        .bind(&new_item.contact_info)
        .bind(&new_item.image_url)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| WallError::NotFound("market item".to_string()))
    }

    /// Get a listing by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<MarketItem>> {
        let item = sqlx::query_as::<_, MarketItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM market_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Fetch a listing and bump its view counter in one statement.
    pub async fn get_and_count_view(&self, id: i64) -> Result<Option<MarketItem>> {
        let item = sqlx::query_as::<_, MarketItem>(&format!(
            "UPDATE market_items SET view_count = view_count + 1
             WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// List active listings, newest first.
    pub async fn list_active(&self) -> Result<Vec<MarketItem>> {
        let items = sqlx::query_as::<_, MarketItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM market_items
             WHERE status = 'active' ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Update the status of a listing.
    ///
    /// Returns false if the listing does not exist.
    pub async fn update_status(&self, id: i64, status: ItemStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE market_items SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
            .bind("seller")
            .bind("hash")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    fn sample_item(title: &str) -> NewMarketItem {
        NewMarketItem {
            user_id: 1,
            title: title.to_string(),
            description: Some("lightly used".to_string()),
            price: Some("¥20".to_string()),
            contact_info: Some("wechat: seller".to_string()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_active() {
        let db = setup().await;
        let repo = MarketRepository::new(db.pool());

        let item = repo.create(&sample_item("calculator")).await.unwrap();
        assert_eq!(item.status, "active");
        assert_eq!(item.item_status(), Some(ItemStatus::Active));
        assert_eq!(item.view_count, 0);
    }

    #[tokio::test]
    async fn test_view_counter() {
        let db = setup().await;
        let repo = MarketRepository::new(db.pool());

        let item = repo.create(&sample_item("bike")).await.unwrap();

        let viewed = repo.get_and_count_view(item.id).await.unwrap().unwrap();
        assert_eq!(viewed.view_count, 1);
        let viewed = repo.get_and_count_view(item.id).await.unwrap().unwrap();
        assert_eq!(viewed.view_count, 2);

        assert!(repo.get_and_count_view(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_excludes_others() {
        let db = setup().await;
        let repo = MarketRepository::new(db.pool());

        let kept = repo.create(&sample_item("kept")).await.unwrap();
        let sold = repo.create(&sample_item("sold")).await.unwrap();
        repo.update_status(sold.id, ItemStatus::Sold).await.unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = setup().await;
        let repo = MarketRepository::new(db.pool());

        let item = repo.create(&sample_item("desk")).await.unwrap();
        assert!(repo.update_status(item.id, ItemStatus::Removed).await.unwrap());

        let updated = repo.get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(updated.item_status(), Some(ItemStatus::Removed));

        assert!(!repo.update_status(9999, ItemStatus::Sold).await.unwrap());
    }
}
