//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::menu;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{Menu, MenuCreate, MenuUpdate};

/// GET /api/v1/restaurants/{restaurantId}/menus - 列出菜单
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<ApiData<Vec<Menu>>>> {
    let menus = menu::find_all(&state.pool, restaurant_id).await?;
    Ok(data(menus))
}

/// POST /api/v1/restaurants/{restaurantId}/menus - 创建菜单
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<MenuCreate>,
) -> AppResult<(StatusCode, Json<ApiData<Menu>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let created = menu::create(&state.pool, restaurant_id, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{restaurantId}/menus/{id} - 查询菜单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiData<Menu>>> {
    let found = menu::find_by_id(&state.pool, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/restaurants/{restaurantId}/menus/{id} - 更新菜单
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<MenuUpdate>,
) -> AppResult<Json<ApiData<Menu>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let updated = menu::update(&state.pool, restaurant_id, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{restaurantId}/menus/{id} - 删除菜单
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    menu::delete(&state.pool, restaurant_id, id).await?;
    Ok(message("Menu deleted successfully"))
}
