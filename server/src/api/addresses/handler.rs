//! Address API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::address;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{Address, AddressCreate, AddressUpdate};

/// GET /api/v1/restaurants/{restaurantId}/addresses - 列出地址 (主地址优先)
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<ApiData<Vec<Address>>>> {
    let addresses = address::find_all(&state.pool, restaurant_id).await?;
    Ok(data(addresses))
}

/// POST /api/v1/restaurants/{restaurantId}/addresses - 创建地址
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<AddressCreate>,
) -> AppResult<(StatusCode, Json<ApiData<Address>>)> {
    validate_create(&payload)?;
    let created = address::create(&state.pool, restaurant_id, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{restaurantId}/addresses/{id} - 查询地址
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiData<Address>>> {
    let found = address::find_by_id(&state.pool, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Address {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/restaurants/{restaurantId}/addresses/{id} - 更新地址
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<ApiData<Address>>> {
    validate_coords(payload.latitude, payload.longitude)?;
    let updated = address::update(&state.pool, restaurant_id, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{restaurantId}/addresses/{id} - 删除地址
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    address::delete(&state.pool, restaurant_id, id).await?;
    Ok(message("Address deleted successfully"))
}

fn validate_create(payload: &AddressCreate) -> Result<(), AppError> {
    validate_required_text(&payload.street_address, "streetAddress", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.city, "city", MAX_NAME_LEN)?;
    validate_required_text(&payload.state_province, "stateProvince", MAX_NAME_LEN)?;
    validate_required_text(&payload.postal_code, "postalCode", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.country, "country", MAX_NAME_LEN)?;
    validate_coords(payload.latitude, payload.longitude)?;
    Ok(())
}

fn validate_coords(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    if let Some(lat) = latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        return Err(AppError::validation("latitude must be within [-90, 90]"));
    }
    if let Some(lon) = longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        return Err(AppError::validation("longitude must be within [-180, 180]"));
    }
    Ok(())
}
