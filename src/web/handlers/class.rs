//! Class (hall) handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::board::{service, Class};
use crate::web::dto::{ApiResponse, ClassDetailResponse, CreateClassRequest};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// GET /api/classes - The hall: all classes, newest first.
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Class>>>, ApiError> {
    let classes = service::list_classes(state.db.pool()).await?;
    Ok(Json(ApiResponse::new(classes)))
}

/// POST /api/classes - Open a class on the wall.
///
/// Opening a class that already exists returns the existing class rather
/// than failing.
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Class>>), ApiError> {
    let class = service::create_class(state.db.pool(), &req.name, &state.cohort).await?;

    tracing::debug!(user_id = user.id, class_id = class.id, "Class requested");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(class))))
}

/// GET /api/classes/:id - One class with its posts and comments.
pub async fn class_detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(class_id): Path<i64>,
) -> Result<Json<ApiResponse<ClassDetailResponse>>, ApiError> {
    let detail = service::class_detail(state.db.pool(), class_id).await?;

    Ok(Json(ApiResponse::new(ClassDetailResponse::from_detail(
        detail,
        &state.images,
    ))))
}
