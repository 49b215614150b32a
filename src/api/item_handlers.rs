//! Item Handlers
//!
//! Listing and lookup are public; writes run behind the auth middleware.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::handlers::{AppState, SuccessResponse};
use super::middleware::AuthUser;
use crate::models::{CreateItemRequest, Item, ItemListResponse, ListItemsParams, UpdateItemRequest};
use crate::utils::error::AppResult;

/// GET /api/items?limit=&page=&sort=&search=
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListItemsParams>,
) -> AppResult<Json<SuccessResponse<ItemListResponse>>> {
    let response = state.item_service.list(params).await?;
    Ok(Json(SuccessResponse::new(response)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse<Item>>> {
    let item = state.item_service.get(item_id).await?;
    Ok(Json(SuccessResponse::new(item)))
}

/// Create an item owned by the caller
pub async fn create_item(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<SuccessResponse<Item>>)> {
    let item = state.item_service.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(item))))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> AppResult<Json<SuccessResponse<Item>>> {
    let item = state
        .item_service
        .update(&actor, item_id, request)
        .await?;
    Ok(Json(SuccessResponse::new(item)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.item_service.delete(&actor, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
