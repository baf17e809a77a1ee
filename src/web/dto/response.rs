//! Response DTOs for the Memwall API.

use serde::Serialize;

use crate::board::{Class, ClassDetail, CommentView};
use crate::db::{InviteCode, InviteCodeDetail, User};
use crate::market::MarketItem;
use crate::storage::ImageStore;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Campus.
    pub campus: String,
    /// School type.
    pub school_type: String,
    /// Graduation year.
    pub graduation_year: String,
    /// Class name.
    pub class_name: String,
    /// Whether the user is an administrator.
    pub is_admin: bool,
    /// Account creation timestamp.
    pub created_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            campus: user.campus.clone(),
            school_type: user.school_type.clone(),
            graduation_year: user.graduation_year.clone(),
            class_name: user.class_name.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at.clone(),
        }
    }
}

/// Registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// ID of the newly registered user.
    pub user_id: i64,
}

/// One invite code as shown to its creator.
#[derive(Debug, Serialize)]
pub struct InviteCodeInfo {
    /// The token.
    pub code: String,
    /// Whether it has been redeemed.
    pub used: bool,
    /// Username of the consumer, if redeemed.
    pub used_by: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Redemption timestamp.
    pub used_at: Option<String>,
}

impl From<InviteCodeDetail> for InviteCodeInfo {
    fn from(detail: InviteCodeDetail) -> Self {
        Self {
            code: detail.code,
            used: detail.used_at.is_some(),
            used_by: detail.used_by_name,
            created_at: detail.created_at,
            used_at: detail.used_at,
        }
    }
}

impl From<InviteCode> for InviteCodeInfo {
    fn from(code: InviteCode) -> Self {
        Self {
            used: code.is_used(),
            code: code.code,
            used_by: None,
            created_at: code.created_at,
            used_at: code.used_at,
        }
    }
}

/// A comment as rendered on a class page.
#[derive(Debug, Serialize)]
pub struct CommentInfo {
    /// Comment ID.
    pub id: i64,
    /// Author username (None if the author is gone).
    pub author_name: Option<String>,
    /// Text content.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<CommentView> for CommentInfo {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.id,
            author_name: view.author_name,
            content: view.content,
            created_at: view.created_at,
        }
    }
}

/// A post as rendered on a class page, with its image resolved to a
/// public URL.
#[derive(Debug, Serialize)]
pub struct PostInfo {
    /// Post ID.
    pub id: i64,
    /// Class the post belongs to.
    pub class_id: i64,
    /// Author username (None if the author is gone).
    pub author_name: Option<String>,
    /// Text content.
    pub content: String,
    /// Public image URL, empty if the post has no image.
    pub image_url: String,
    /// Like counter.
    pub likes: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Comments, oldest first.
    pub comments: Vec<CommentInfo>,
}

/// A class page: the class plus its posts and comments.
#[derive(Debug, Serialize)]
pub struct ClassDetailResponse {
    /// The class.
    pub class: Class,
    /// Posts, newest first.
    pub posts: Vec<PostInfo>,
}

impl ClassDetailResponse {
    /// Build the response from a domain ClassDetail, resolving image URLs.
    pub fn from_detail(detail: ClassDetail, images: &ImageStore) -> Self {
        let posts = detail
            .posts
            .into_iter()
            .map(|p| PostInfo {
                id: p.post.id,
                class_id: p.post.class_id,
                author_name: p.post.author_name,
                content: p.post.content,
                image_url: images.public_url(p.post.image.as_deref().unwrap_or_default()),
                likes: p.post.likes,
                created_at: p.post.created_at,
                comments: p.comments.into_iter().map(CommentInfo::from).collect(),
            })
            .collect();

        Self {
            class: detail.class,
            posts,
        }
    }
}

/// Response for actions on a post (like, comment): where to go next.
#[derive(Debug, Serialize)]
pub struct PostActionResponse {
    /// Class the post belongs to.
    pub class_id: i64,
}

/// Response for a freshly published post.
#[derive(Debug, Serialize)]
pub struct CreatedPostResponse {
    /// New post ID.
    pub post_id: i64,
    /// Class the post belongs to.
    pub class_id: i64,
    /// Public image URL, empty if the post has no image.
    pub image_url: String,
}

/// A market listing with its image resolved to a public URL.
#[derive(Debug, Serialize)]
pub struct MarketItemInfo {
    /// Item ID.
    pub id: i64,
    /// Selling user.
    pub user_id: i64,
    /// Listing title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// Asking price.
    pub price: Option<String>,
    /// Seller contact.
    pub contact_info: Option<String>,
    /// Public image URL, empty if none.
    pub image_url: String,
    /// Status string.
    pub status: String,
    /// Detail view counter.
    pub view_count: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl MarketItemInfo {
    /// Build the response from a domain MarketItem, resolving the image URL.
    pub fn from_item(item: MarketItem, images: &ImageStore) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            title: item.title,
            description: item.description,
            price: item.price,
            contact_info: item.contact_info,
            image_url: images.public_url(item.image_url.as_deref().unwrap_or_default()),
            status: item.status,
            view_count: item.view_count,
            created_at: item.created_at,
        }
    }
}
