//! Second-hand market handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::str::FromStr;
use std::sync::Arc;

use crate::auth::can_modify_resource;
use crate::market::{ItemStatus, MarketRepository, NewMarketItem};
use crate::web::dto::{
    ApiResponse, CreateMarketItemRequest, MarketItemInfo, UpdateItemStatusRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// GET /api/market - Active listings, newest first.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<MarketItemInfo>>>, ApiError> {
    let items = MarketRepository::new(state.db.pool()).list_active().await?;

    Ok(Json(ApiResponse::new(
        items
            .into_iter()
            .map(|item| MarketItemInfo::from_item(item, &state.images))
            .collect(),
    )))
}

/// POST /api/market - Create a listing.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateMarketItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MarketItemInfo>>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::unprocessable("title cannot be empty"));
    }

    let item = MarketRepository::new(state.db.pool())
        .create(&NewMarketItem {
            user_id: user.id,
            title: req.title.trim().to_string(),
            description: req.description,
            price: req.price,
            contact_info: req.contact_info,
            image_url: req.image_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(MarketItemInfo::from_item(
            item,
            &state.images,
        ))),
    ))
}

/// GET /api/market/:id - One listing; counts the view.
pub async fn item_detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<MarketItemInfo>>, ApiError> {
    let item = MarketRepository::new(state.db.pool())
        .get_and_count_view(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("market item not found"))?;

    Ok(Json(ApiResponse::new(MarketItemInfo::from_item(
        item,
        &state.images,
    ))))
}

/// POST /api/market/:id/status - Update a listing's status.
///
/// Only the seller or an admin may change it.
pub async fn update_item_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemStatusRequest>,
) -> Result<Json<ApiResponse<MarketItemInfo>>, ApiError> {
    let status = ItemStatus::from_str(&req.status)
        .map_err(|e| ApiError::unprocessable(e))?;

    let repo = MarketRepository::new(state.db.pool());
    let item = repo
        .get_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("market item not found"))?;

    if !can_modify_resource(&user, item.user_id) {
        return Err(ApiError::forbidden());
    }

    repo.update_status(item_id, status).await?;

    let updated = repo
        .get_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("market item not found"))?;

    Ok(Json(ApiResponse::new(MarketItemInfo::from_item(
        updated,
        &state.images,
    ))))
}
