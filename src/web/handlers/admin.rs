//! Administration handlers.
//!
//! All routes here require the admin flag; non-admins receive the fixed
//! forbidden response.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::invite;
use crate::db::InviteCodeRepository;
use crate::web::dto::{ApiResponse, GenerateCodesRequest, InviteCodeInfo};
use crate::web::error::ApiError;
use crate::web::middleware::AdminUser;

use super::AppState;

/// GET /api/admin/invites - List system invite codes.
pub async fn list_system_codes(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<InviteCodeInfo>>>, ApiError> {
    let repo = InviteCodeRepository::new(state.db.pool());
    let codes = repo.list_system().await?;

    Ok(Json(ApiResponse::new(
        codes.into_iter().map(InviteCodeInfo::from).collect(),
    )))
}

/// POST /api/admin/invites - Batch-generate system invite codes.
///
/// The count defaults to 1 and is clamped to the configured batch
/// maximum.
pub async fn generate_codes(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<GenerateCodesRequest>,
) -> Result<Json<ApiResponse<Vec<InviteCodeInfo>>>, ApiError> {
    let count = req.count.unwrap_or(1).clamp(1, state.admin_batch_max);

    let codes = invite::generate_batch(state.db.pool(), None, count).await?;

    tracing::info!(
        admin_id = admin.id,
        count = codes.len(),
        "System invite codes generated"
    );

    Ok(Json(ApiResponse::new(
        codes.into_iter().map(InviteCodeInfo::from).collect(),
    )))
}
