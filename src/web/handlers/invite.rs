//! Invite code handlers for regular members.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::InviteCodeRepository;
use crate::web::dto::{ApiResponse, InviteCodeInfo};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// GET /api/invites/mine - Codes created by the current user.
pub async fn my_codes(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<InviteCodeInfo>>>, ApiError> {
    let repo = InviteCodeRepository::new(state.db.pool());
    let codes = repo.list_by_creator_detailed(user.id).await?;

    Ok(Json(ApiResponse::new(
        codes.into_iter().map(InviteCodeInfo::from).collect(),
    )))
}
