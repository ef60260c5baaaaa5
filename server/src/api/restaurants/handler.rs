//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::restaurant::{self, RestaurantFilter};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text,
    validate_page_query, validate_required_text,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{
    PriceRange, RestaurantCreate, RestaurantDetail, RestaurantSummary, RestaurantUpdate,
};
use shared::pagination::{PageQuery, Paginated, SortOrder};

/// Query params for listing restaurants
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub rating_min: Option<f64>,
    pub is_active: Option<bool>,
}

/// GET /api/v1/restaurants - 分页列出餐厅
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<RestaurantSummary>>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        order: query.order,
    };
    validate_page_query(&page)?;

    let filter = RestaurantFilter {
        search: query.search,
        city: query.city,
        category: query.category,
        price_range: query.price_range,
        rating_min: query.rating_min,
        is_active: query.is_active,
    };
    let result = restaurant::find_all(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

/// POST /api/v1/restaurants - 创建餐厅
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<(StatusCode, Json<ApiData<RestaurantSummary>>)> {
    validate_create(&payload)?;
    let created = restaurant::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{id} - 餐厅详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<RestaurantDetail>>> {
    let detail = restaurant::get_detail(&state.pool, id).await?;
    Ok(data(detail))
}

/// GET /api/v1/restaurants/slug/{slug} - 按 slug 查询餐厅
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiData<RestaurantDetail>>> {
    let detail = restaurant::get_detail_by_slug(&state.pool, &slug).await?;
    Ok(data(detail))
}

/// PATCH /api/v1/restaurants/{id} - 更新餐厅
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<ApiData<RestaurantSummary>>> {
    validate_update(&payload)?;
    let updated = restaurant::update(&state.pool, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{id} - 删除餐厅 (硬删除, 级联子资源)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    restaurant::delete(&state.pool, id).await?;
    Ok(message("Restaurant deleted successfully"))
}

fn validate_create(payload: &RestaurantCreate) -> Result<(), AppError> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.slug, "slug", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.website, "website", MAX_URL_LEN)?;
    validate_optional_text(&payload.logo_url, "logoUrl", MAX_URL_LEN)?;
    validate_optional_text(&payload.cover_image_url, "coverImageUrl", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(payload: &RestaurantUpdate) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref slug) = payload.slug {
        validate_required_text(slug, "slug", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.website, "website", MAX_URL_LEN)?;
    validate_optional_text(&payload.logo_url, "logoUrl", MAX_URL_LEN)?;
    validate_optional_text(&payload.cover_image_url, "coverImageUrl", MAX_URL_LEN)?;
    Ok(())
}
