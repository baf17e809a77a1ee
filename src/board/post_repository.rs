//! Post and comment repository for Memwall.

use super::types::{Comment, CommentView, NewComment, NewPost, Post, PostView};
use crate::db::DbPool;
use crate::{Result, WallError};

/// Repository for post and comment operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (class_id, user_id, content, image)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(new_post.class_id)
        .bind(new_post.user_id)
        .bind(&new_post.content)
        .bind(&new_post.image)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| WallError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, class_id, user_id, content, image, likes, created_at
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// List posts in a class with author names, newest first.
    ///
    /// LEFT JOIN keeps posts visible even if the author row is gone.
    pub async fn list_for_class(&self, class_id: i64) -> Result<Vec<PostView>> {
        let posts = sqlx::query_as::<_, PostView>(
            "SELECT p.id, p.class_id, p.user_id, u.username AS author_name,
                    p.content, p.image, p.likes, p.created_at
             FROM posts p
             LEFT JOIN users u ON p.user_id = u.id
             WHERE p.class_id = $1
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .bind(class_id)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Increment the like counter for a post.
    ///
    /// Returns the post's class id, or None if the post does not exist.
    pub async fn like(&self, post_id: i64) -> Result<Option<i64>> {
        let class_id: Option<i64> = sqlx::query_scalar(
            "UPDATE posts SET likes = likes + 1 WHERE id = $1 RETURNING class_id",
        )
        .bind(post_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(class_id)
    }

    /// Create a new comment.
    pub async fn create_comment(&self, new_comment: &NewComment) -> Result<Comment> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (post_id, user_id, content)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_comment.post_id)
        .bind(new_comment.user_id)
        .bind(&new_comment.content)
        .fetch_one(self.pool)
        .await?;

        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, user_id, content, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        comment.ok_or_else(|| WallError::NotFound("comment".to_string()))
    }

    /// List comments on a post with author names, oldest first.
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let comments = sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.post_id, c.user_id, u.username AS author_name,
                    c.content, c.created_at
             FROM comments c
             LEFT JOIN users u ON c.user_id = u.id
             WHERE c.post_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }
}
