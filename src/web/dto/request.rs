//! Request DTOs for the Memwall API.

use serde::Deserialize;

/// Registration request.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Invite code to redeem.
    pub invite_code: String,
    /// Desired username.
    pub username: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Campus.
    #[serde(default)]
    pub campus: String,
    /// School type.
    #[serde(default)]
    pub school_type: String,
    /// Graduation year.
    #[serde(default)]
    pub graduation_year: String,
    /// Class name.
    #[serde(default)]
    pub class_name: String,
}

/// Login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Class creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    /// Class display name.
    pub name: String,
}

/// Comment creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    /// Comment text.
    pub content: String,
}

/// Admin invite code batch generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCodesRequest {
    /// How many codes to generate (clamped by configuration).
    #[serde(default)]
    pub count: Option<u32>,
}

/// Market listing creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMarketItemRequest {
    /// Listing title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Asking price, free text.
    #[serde(default)]
    pub price: Option<String>,
    /// How to reach the seller.
    #[serde(default)]
    pub contact_info: Option<String>,
    /// Image URL for the listing.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Market listing status update request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemStatusRequest {
    /// New status: active, sold, or removed.
    pub status: String,
}
