//! Schedule API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::schedule;
use crate::utils::validation::{validate_day_of_week, validate_time_hhmm};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{Schedule, ScheduleCreate, ScheduleUpdate};

/// GET /api/v1/restaurants/{restaurantId}/schedules - 按星期列出营业时间
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<ApiData<Vec<Schedule>>>> {
    let schedules = schedule::find_all(&state.pool, restaurant_id).await?;
    Ok(data(schedules))
}

/// POST /api/v1/restaurants/{restaurantId}/schedules - 创建营业时间
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<ScheduleCreate>,
) -> AppResult<(StatusCode, Json<ApiData<Schedule>>)> {
    validate_day_of_week(payload.day_of_week)?;
    let is_closed = payload.is_closed.unwrap_or(false);
    if !is_closed {
        let open = payload
            .open_time
            .as_deref()
            .ok_or_else(|| AppError::validation("openTime is required on open days"))?;
        let close = payload
            .close_time
            .as_deref()
            .ok_or_else(|| AppError::validation("closeTime is required on open days"))?;
        validate_time_hhmm(open, "openTime")?;
        validate_time_hhmm(close, "closeTime")?;
    }

    let created = schedule::create(&state.pool, restaurant_id, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{restaurantId}/schedules/{id} - 查询营业时间
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiData<Schedule>>> {
    let found = schedule::find_by_id(&state.pool, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Schedule {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/restaurants/{restaurantId}/schedules/{id} - 更新营业时间
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ScheduleUpdate>,
) -> AppResult<Json<ApiData<Schedule>>> {
    if let Some(day) = payload.day_of_week {
        validate_day_of_week(day)?;
    }
    if let Some(ref open) = payload.open_time {
        validate_time_hhmm(open, "openTime")?;
    }
    if let Some(ref close) = payload.close_time {
        validate_time_hhmm(close, "closeTime")?;
    }

    let updated = schedule::update(&state.pool, restaurant_id, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{restaurantId}/schedules/{id} - 删除营业时间
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    schedule::delete(&state.pool, restaurant_id, id).await?;
    Ok(message("Schedule deleted successfully"))
}
