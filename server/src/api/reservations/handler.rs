//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::reservation::{self, ReservationFilter};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_date_ymd,
    validate_optional_text, validate_page_query, validate_party_size, validate_required_text,
    validate_time_hhmm,
};
use crate::utils::{ApiData, AppError, AppResult, data};
use shared::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
use shared::pagination::{PageQuery, Paginated, SortOrder};

/// Query params for listing reservations
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub restaurant_id: Option<i64>,
    // userId 以查询参数传入；认证落地后改从令牌读取
    pub user_id: Option<i64>,
    pub status: Option<ReservationStatus>,
    pub date: Option<String>,
}

/// GET /api/v1/reservations - 分页列出预订
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Reservation>>> {
    let (filter, page) = build_filter(query)?;
    let result = reservation::find_all(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

/// GET /api/v1/reservations/my-reservations - 当前用户的预订
pub async fn my_reservations(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Reservation>>> {
    let (filter, page) = build_filter(query)?;
    let result = reservation::find_all(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

/// POST /api/v1/reservations - 创建预订 (初始状态 pending)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<ApiData<Reservation>>)> {
    validate_create(&payload)?;
    let created = reservation::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/reservations/{id} - 查询预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<Reservation>>> {
    let found = reservation::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/reservations/{id} - 更新预订
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<ApiData<Reservation>>> {
    validate_update(&payload)?;
    let updated = reservation::update(&state.pool, id, payload).await?;
    Ok(data(updated))
}

/// PATCH /api/v1/reservations/{id}/cancel - 取消预订 (软取消)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<Reservation>>> {
    let cancelled = reservation::cancel(&state.pool, id).await?;
    Ok(data(cancelled))
}

/// DELETE /api/v1/reservations/{id} - 与 cancel 等价, 不做物理删除
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<Reservation>>> {
    let cancelled = reservation::cancel(&state.pool, id).await?;
    Ok(data(cancelled))
}

fn build_filter(query: ListQuery) -> Result<(ReservationFilter, PageQuery), AppError> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        order: query.order,
    };
    validate_page_query(&page)?;

    let date = match query.date {
        Some(ref raw) => Some(validate_date_ymd(raw, "date")?),
        None => None,
    };
    Ok((
        ReservationFilter {
            restaurant_id: query.restaurant_id,
            user_id: query.user_id,
            status: query.status,
            date,
        },
        page,
    ))
}

fn validate_create(payload: &ReservationCreate) -> Result<(), AppError> {
    validate_required_text(&payload.guest_name, "guestName", MAX_NAME_LEN)?;
    validate_required_text(&payload.guest_email, "guestEmail", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.guest_phone, "guestPhone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.special_requests, "specialRequests", MAX_NOTE_LEN)?;
    validate_party_size(payload.party_size)?;
    validate_date_ymd(&payload.reservation_date, "reservationDate")?;
    validate_time_hhmm(&payload.reservation_time, "reservationTime")?;
    Ok(())
}

fn validate_update(payload: &ReservationUpdate) -> Result<(), AppError> {
    if let Some(ref name) = payload.guest_name {
        validate_required_text(name, "guestName", MAX_NAME_LEN)?;
    }
    if let Some(ref email) = payload.guest_email {
        validate_required_text(email, "guestEmail", MAX_EMAIL_LEN)?;
    }
    if let Some(ref phone) = payload.guest_phone {
        validate_required_text(phone, "guestPhone", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.special_requests, "specialRequests", MAX_NOTE_LEN)?;
    if let Some(size) = payload.party_size {
        validate_party_size(size)?;
    }
    if let Some(ref date) = payload.reservation_date {
        validate_date_ymd(date, "reservationDate")?;
    }
    if let Some(ref time) = payload.reservation_time {
        validate_time_hhmm(time, "reservationTime")?;
    }
    Ok(())
}
