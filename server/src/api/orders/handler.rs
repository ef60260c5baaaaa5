//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::order::{self, OrderFilter};
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_optional_text, validate_page_query, validate_price, validate_quantity,
};
use crate::utils::{ApiData, AppError, AppResult, data};
use shared::models::{OrderCreate, OrderStatus, OrderUpdate, OrderWithItems};
use shared::pagination::{PageQuery, Paginated, SortOrder};

/// Query params for listing orders
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
    pub status: Option<OrderStatus>,
}

/// GET /api/v1/orders - 分页列出订单
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<OrderWithItems>>> {
    let (filter, page) = build_filter(query)?;
    let result = order::find_all(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

/// GET /api/v1/orders/my-orders - 当前用户的订单
pub async fn my_orders(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<OrderWithItems>>> {
    let (filter, page) = build_filter(query)?;
    let result = order::find_all(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

/// POST /api/v1/orders - 创建订单 (金额在创建时一次性计算)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<ApiData<OrderWithItems>>)> {
    validate_create(&payload)?;
    let created = order::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/orders/{id} - 查询订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<OrderWithItems>>> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/orders/{id} - 更新订单状态/备注
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<ApiData<OrderWithItems>>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let updated = order::update(&state.pool, id, payload).await?;
    Ok(data(updated))
}

/// PATCH /api/v1/orders/{id}/cancel - 取消订单 (软取消)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<OrderWithItems>>> {
    let cancelled = order::cancel(&state.pool, id).await?;
    Ok(data(cancelled))
}

/// DELETE /api/v1/orders/{id} - 与 cancel 等价, 不做物理删除
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<OrderWithItems>>> {
    let cancelled = order::cancel(&state.pool, id).await?;
    Ok(data(cancelled))
}

fn build_filter(query: ListQuery) -> Result<(OrderFilter, PageQuery), AppError> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        order: query.order,
    };
    validate_page_query(&page)?;

    Ok((
        OrderFilter {
            restaurant_id: query.restaurant_id,
            user_id: query.user_id,
            status: query.status,
        },
        page,
    ))
}

fn validate_create(payload: &OrderCreate) -> Result<(), AppError> {
    if payload.items.is_empty() {
        return Err(AppError::validation("order must contain at least one item"));
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    for (index, item) in payload.items.iter().enumerate() {
        validate_quantity(item.quantity)
            .map_err(|_| AppError::validation(format!("items[{index}].quantity must be >= 1")))?;
        validate_price(item.unit_price, &format!("items[{index}].unitPrice"))?;
        validate_optional_text(&item.notes, "notes", MAX_NOTE_LEN)?;
    }
    Ok(())
}
