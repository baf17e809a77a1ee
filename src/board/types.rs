//! Wall models for Memwall.
//!
//! A class is a hall on the memory wall; members post updates into it and
//! comment on each other's posts.

use serde::Serialize;

/// Class entity (one hall on the wall).
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Class {
    /// Unique class ID.
    pub id: i64,
    /// Display name, e.g. "高三(1)班".
    pub name: String,
    /// Full name including the cohort label, e.g. "2025届 高三(1)班". Unique.
    pub full_name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Post entity.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Class the post belongs to.
    pub class_id: i64,
    /// Author (None if the author row is gone).
    pub user_id: Option<i64>,
    /// Text content.
    pub content: String,
    /// Stored image name (None if the post has no image).
    pub image: Option<String>,
    /// Like counter.
    pub likes: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Class the post belongs to.
    pub class_id: i64,
    /// Author.
    pub user_id: i64,
    /// Text content.
    pub content: String,
    /// Stored image name, if an image was uploaded.
    pub image: Option<String>,
}

/// Comment entity.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Comment {
    /// Unique comment ID.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Author (None if the author row is gone).
    pub user_id: Option<i64>,
    /// Text content.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Author.
    pub user_id: i64,
    /// Text content.
    pub content: String,
}

/// A post joined with its author name, as shown on a class page.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PostView {
    /// Unique post ID.
    pub id: i64,
    /// Class the post belongs to.
    pub class_id: i64,
    /// Author.
    pub user_id: Option<i64>,
    /// Author username (None if the author row is gone).
    pub author_name: Option<String>,
    /// Text content.
    pub content: String,
    /// Stored image name.
    pub image: Option<String>,
    /// Like counter.
    pub likes: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// A comment joined with its author name.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CommentView {
    /// Unique comment ID.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Author.
    pub user_id: Option<i64>,
    /// Author username (None if the author row is gone).
    pub author_name: Option<String>,
    /// Text content.
    pub content: String,
    /// Creation timestamp.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_holds_fields() {
        let post = NewPost {
            class_id: 1,
            user_id: 2,
            content: "hello wall".to_string(),
            image: None,
        };
        assert_eq!(post.class_id, 1);
        assert!(post.image.is_none());
    }
}
