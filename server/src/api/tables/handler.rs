//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_capacity, validate_date_ymd, validate_optional_text,
    validate_party_size, validate_required_text, validate_time_hhmm,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{AvailabilityReport, DiningTable, DiningTableCreate, DiningTableUpdate};

/// Query params for the availability check
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: String,
    pub time: String,
    pub party_size: Option<i64>,
}

/// GET /api/v1/restaurants/{restaurantId}/tables - 列出桌台
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<ApiData<Vec<DiningTable>>>> {
    let tables = dining_table::find_all(&state.pool, restaurant_id).await?;
    Ok(data(tables))
}

/// GET /api/v1/restaurants/{restaurantId}/tables/availability - 空位查询
pub async fn availability(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiData<AvailabilityReport>>> {
    let date = validate_date_ymd(&query.date, "date")?;
    validate_time_hhmm(&query.time, "time")?;
    if let Some(size) = query.party_size {
        validate_party_size(size)?;
    }

    let report = dining_table::check_availability(
        &state.pool,
        restaurant_id,
        date,
        &query.time,
        query.party_size,
    )
    .await?;
    Ok(data(report))
}

/// POST /api/v1/restaurants/{restaurantId}/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<ApiData<DiningTable>>)> {
    validate_required_text(&payload.table_number, "tableNumber", MAX_NAME_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_NAME_LEN)?;
    validate_capacity(payload.capacity)?;

    let created = dining_table::create(&state.pool, restaurant_id, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{restaurantId}/tables/{id} - 查询桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiData<DiningTable>>> {
    let found = dining_table::find_by_id(&state.pool, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/restaurants/{restaurantId}/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<ApiData<DiningTable>>> {
    if let Some(ref number) = payload.table_number {
        validate_required_text(number, "tableNumber", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.location, "location", MAX_NAME_LEN)?;
    if let Some(capacity) = payload.capacity {
        validate_capacity(capacity)?;
    }

    let updated = dining_table::update(&state.pool, restaurant_id, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{restaurantId}/tables/{id} - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    dining_table::delete(&state.pool, restaurant_id, id).await?;
    Ok(message("Table deleted successfully"))
}
