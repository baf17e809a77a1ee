//! Market listing models for Memwall.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemStatus {
    /// Listed and available.
    #[default]
    Active,
    /// Sold, kept for the record.
    Sold,
    /// Taken down by the seller or an admin.
    Removed,
}

impl ItemStatus {
    /// Convert status to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Sold => "sold",
            ItemStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ItemStatus::Active),
            "sold" => Ok(ItemStatus::Sold),
            "removed" => Ok(ItemStatus::Removed),
            _ => Err(format!("unknown item status: {s}")),
        }
    }
}

/// Market listing entity.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MarketItem {
    /// Unique item ID.
    pub id: i64,
    /// Selling user.
    pub user_id: i64,
    /// Listing title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Asking price, free text.
    pub price: Option<String>,
    /// How to reach the seller.
    pub contact_info: Option<String>,
    /// Image URL or stored upload name.
    pub image_url: Option<String>,
    /// Listing status string ('active', 'sold', 'removed').
    pub status: String,
    /// Number of detail views.
    pub view_count: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl MarketItem {
    /// Get the listing status as enum.
    pub fn item_status(&self) -> Option<ItemStatus> {
        ItemStatus::from_str(&self.status).ok()
    }
}

/// Data for creating a new listing.
#[derive(Debug, Clone)]
pub struct NewMarketItem {
    /// Selling user.
    pub user_id: i64,
    /// Listing title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Asking price, free text.
    pub price: Option<String>,
    /// How to reach the seller.
    pub contact_info: Option<String>,
    /// Image URL or stored upload name.
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [ItemStatus::Active, ItemStatus::Sold, ItemStatus::Removed] {
            assert_eq!(ItemStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert_eq!(ItemStatus::from_str("SOLD").unwrap(), ItemStatus::Sold);
        assert!(ItemStatus::from_str("pending").is_err());
    }

    #[test]
    fn test_status_default() {
        assert_eq!(ItemStatus::default(), ItemStatus::Active);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", ItemStatus::Removed), "removed");
    }
}
