//! Wall service for Memwall.
//!
//! High-level operations over classes, posts, and comments, with input
//! validation on top of the repositories.

use serde::Serialize;
use tracing::info;

use crate::db::DbPool;
use crate::{Result, WallError};

use super::post_repository::PostRepository;
use super::repository::ClassRepository;
use super::types::{Class, CommentView, NewComment, NewPost, PostView};

/// Maximum length for post and comment content (in characters).
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Maximum length for a class name (in characters).
pub const MAX_CLASS_NAME_LENGTH: usize = 50;

/// Validate post or comment content.
fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(WallError::Validation("content cannot be empty".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(WallError::Validation(format!(
            "content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A post together with its comments, as rendered on a class page.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithComments {
    /// The post itself.
    #[serde(flatten)]
    pub post: PostView,
    /// Comments, oldest first.
    pub comments: Vec<CommentView>,
}

/// Everything needed to render one class page.
#[derive(Debug, Clone, Serialize)]
pub struct ClassDetail {
    /// The class.
    pub class: Class,
    /// Posts, newest first, each with its comments.
    pub posts: Vec<PostWithComments>,
}

/// List all classes, newest first.
pub async fn list_classes(pool: &DbPool) -> Result<Vec<Class>> {
    ClassRepository::new(pool).list().await
}

/// Open a class on the wall.
///
/// The full name is the cohort label plus the trimmed display name. If a
/// class with that full name already exists it is returned as-is, so
/// opening twice is a silent no-op.
pub async fn create_class(pool: &DbPool, name: &str, cohort: &str) -> Result<Class> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WallError::Validation(
            "class name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_CLASS_NAME_LENGTH {
        return Err(WallError::Validation(format!(
            "class name must be at most {MAX_CLASS_NAME_LENGTH} characters"
        )));
    }

    let repo = ClassRepository::new(pool);
    let full_name = format!("{cohort} {name}");

    if let Some(existing) = repo.get_by_full_name(&full_name).await? {
        return Ok(existing);
    }

    let class = repo.create(name, &full_name).await?;
    info!(class_id = class.id, full_name = %class.full_name, "Class opened");
    Ok(class)
}

/// Load a class with its posts and their comments.
pub async fn class_detail(pool: &DbPool, class_id: i64) -> Result<ClassDetail> {
    let class = ClassRepository::new(pool)
        .get_by_id(class_id)
        .await?
        .ok_or_else(|| WallError::NotFound("class".to_string()))?;

    let posts_repo = PostRepository::new(pool);
    let posts = posts_repo.list_for_class(class_id).await?;

    let mut detailed = Vec::with_capacity(posts.len());
    for post in posts {
        let comments = posts_repo.list_comments(post.id).await?;
        detailed.push(PostWithComments { post, comments });
    }

    Ok(ClassDetail {
        class,
        posts: detailed,
    })
}

/// Publish a post to a class.
pub async fn add_post(
    pool: &DbPool,
    class_id: i64,
    user_id: i64,
    content: &str,
    image: Option<String>,
) -> Result<super::types::Post> {
    validate_content(content)?;

    ClassRepository::new(pool)
        .get_by_id(class_id)
        .await?
        .ok_or_else(|| WallError::NotFound("class".to_string()))?;

    let post = PostRepository::new(pool)
        .create(&NewPost {
            class_id,
            user_id,
            content: content.to_string(),
            image,
        })
        .await?;

    info!(post_id = post.id, class_id = class_id, user_id = user_id, "Post published");
    Ok(post)
}

/// Like a post.
///
/// Returns the class id of the liked post for redirect purposes.
pub async fn like_post(pool: &DbPool, post_id: i64) -> Result<i64> {
    PostRepository::new(pool)
        .like(post_id)
        .await?
        .ok_or_else(|| WallError::NotFound("post".to_string()))
}

/// Comment on a post.
///
/// Returns the class id of the commented post for redirect purposes.
pub async fn add_comment(
    pool: &DbPool,
    post_id: i64,
    user_id: i64,
    content: &str,
) -> Result<i64> {
    validate_content(content)?;

    let post = PostRepository::new(pool)
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| WallError::NotFound("post".to_string()))?;

    PostRepository::new(pool)
        .create_comment(&NewComment {
            post_id,
            user_id,
            content: content.to_string(),
        })
        .await?;

    Ok(post.class_id)
}

/// Report a post.
///
/// Reports are recorded in the server log for an operator to review; the
/// post itself is untouched.
pub async fn report_post(pool: &DbPool, post_id: i64, reporter_id: i64) -> Result<()> {
    PostRepository::new(pool)
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| WallError::NotFound("post".to_string()))?;

    info!(post_id = post_id, reporter_id = reporter_id, "Post reported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2)")
            .bind("poster")
            .bind("hash")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_class_builds_full_name() {
        let db = setup().await;

        let class = create_class(db.pool(), "  高三(1)班  ", "2025届").await.unwrap();
        assert_eq!(class.name, "高三(1)班");
        assert_eq!(class.full_name, "2025届 高三(1)班");
    }

    #[tokio::test]
    async fn test_create_class_twice_is_noop() {
        let db = setup().await;

        let first = create_class(db.pool(), "A", "2025届").await.unwrap();
        let second = create_class(db.pool(), "A", "2025届").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(list_classes(db.pool()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_class_empty_name() {
        let db = setup().await;
        assert!(matches!(
            create_class(db.pool(), "   ", "2025届").await,
            Err(WallError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_class_detail_assembles_posts_and_comments() {
        let db = setup().await;

        let class = create_class(db.pool(), "A", "2025届").await.unwrap();
        let post = add_post(db.pool(), class.id, 1, "hello wall", None)
            .await
            .unwrap();
        add_comment(db.pool(), post.id, 1, "nice one").await.unwrap();
        like_post(db.pool(), post.id).await.unwrap();

        let detail = class_detail(db.pool(), class.id).await.unwrap();
        assert_eq!(detail.class.id, class.id);
        assert_eq!(detail.posts.len(), 1);
        assert_eq!(detail.posts[0].post.likes, 1);
        assert_eq!(detail.posts[0].comments.len(), 1);
        assert_eq!(detail.posts[0].comments[0].content, "nice one");
    }

    #[tokio::test]
    async fn test_class_detail_missing_class() {
        let db = setup().await;
        assert!(matches!(
            class_detail(db.pool(), 42).await,
            Err(WallError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_post_validation() {
        let db = setup().await;
        let class = create_class(db.pool(), "A", "2025届").await.unwrap();

        assert!(matches!(
            add_post(db.pool(), class.id, 1, "   ", None).await,
            Err(WallError::Validation(_))
        ));
        assert!(matches!(
            add_post(db.pool(), 42, 1, "content", None).await,
            Err(WallError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_comment_returns_class_id() {
        let db = setup().await;
        let class = create_class(db.pool(), "A", "2025届").await.unwrap();
        let post = add_post(db.pool(), class.id, 1, "post", None).await.unwrap();

        let class_id = add_comment(db.pool(), post.id, 1, "comment").await.unwrap();
        assert_eq!(class_id, class.id);

        assert!(matches!(
            add_comment(db.pool(), 999, 1, "comment").await,
            Err(WallError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_report_post() {
        let db = setup().await;
        let class = create_class(db.pool(), "A", "2025届").await.unwrap();
        let post = add_post(db.pool(), class.id, 1, "post", None).await.unwrap();

        assert!(report_post(db.pool(), post.id, 1).await.is_ok());
        assert!(matches!(
            report_post(db.pool(), 999, 1).await,
            Err(WallError::NotFound(_))
        ));
    }
}
