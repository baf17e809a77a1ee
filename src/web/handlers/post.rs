//! Post handlers: publishing, likes, comments, reports.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::board::service;
use crate::web::dto::{
    ApiResponse, CommentRequest, CreatedPostResponse, MessageResponse, PostActionResponse,
};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// POST /api/classes/:id/posts - Publish a post (multipart form).
///
/// Accepts a `content` text field and an optional `image` file field.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(class_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<CreatedPostResponse>>), ApiError> {
    let mut content = String::new();
    let mut image: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("content") => {
                content = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid content field: {e}")))?;
            }
            Some("image") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                if original_name.is_empty() {
                    // Empty file input on the form
                    continue;
                }

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid image field: {e}")))?;
                if bytes.len() > state.max_upload_bytes {
                    return Err(ApiError::unprocessable("image is too large"));
                }

                let stored = state
                    .images
                    .save(&bytes, &original_name)
                    .map_err(|e| ApiError::unprocessable(e.to_string()))?;
                image = Some(stored);
            }
            _ => {}
        }
    }

    let post = service::add_post(state.db.pool(), class_id, user.id, &content, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CreatedPostResponse {
            post_id: post.id,
            class_id: post.class_id,
            image_url: state
                .images
                .public_url(post.image.as_deref().unwrap_or_default()),
        })),
    ))
}

/// POST /api/posts/:id/like - Like a post.
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<PostActionResponse>>, ApiError> {
    let class_id = service::like_post(state.db.pool(), post_id).await?;
    Ok(Json(ApiResponse::new(PostActionResponse { class_id })))
}

/// POST /api/posts/:id/comments - Comment on a post.
pub async fn comment_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostActionResponse>>), ApiError> {
    let class_id = service::add_comment(state.db.pool(), post_id, user.id, &req.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PostActionResponse { class_id })),
    ))
}

/// POST /api/posts/:id/report - Report a post.
pub async fn report_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    service::report_post(state.db.pool(), post_id, user.id).await?;

    Ok(Json(ApiResponse::new(MessageResponse {
        message: "Report received; an operator will review it.".to_string(),
    })))
}
