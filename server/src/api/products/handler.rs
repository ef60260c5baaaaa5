//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::product::{self, ProductFilter};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_page_query,
    validate_price, validate_required_text,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::pagination::{PageQuery, Paginated, SortOrder};

/// Query params for listing products
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

/// GET /api/v1/restaurants/{restaurantId}/products - 分页列出菜品
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        order: query.order,
    };
    validate_page_query(&page)?;

    let filter = ProductFilter {
        search: query.search,
        category: query.category,
        is_available: query.is_available,
        is_active: query.is_active,
        price_min: query.price_min,
        price_max: query.price_max,
    };
    let result = product::find_all(&state.pool, restaurant_id, &filter, &page).await?;
    Ok(Json(result))
}

/// POST /api/v1/restaurants/{restaurantId}/products - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ApiData<Product>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "imageUrl", MAX_URL_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_price(payload.price, "price")?;

    let created = product::create(&state.pool, restaurant_id, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{restaurantId}/products/{id} - 查询菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiData<Product>>> {
    let found = product::find_by_id(&state.pool, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/restaurants/{restaurantId}/products/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiData<Product>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "imageUrl", MAX_URL_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_NAME_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }

    let updated = product::update(&state.pool, restaurant_id, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{restaurantId}/products/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    product::delete(&state.pool, restaurant_id, id).await?;
    Ok(message("Product deleted successfully"))
}
