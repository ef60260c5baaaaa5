//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::review::{self, ReviewFilter};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_page_query, validate_rating,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{Review, ReviewCreate, ReviewUpdate};
use shared::pagination::{PageQuery, Paginated, SortOrder};

/// Query params for listing reviews
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub rating: Option<i64>,
    pub is_visible: Option<bool>,
}

/// GET /api/v1/restaurants/{restaurantId}/reviews - 分页列出点评
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Review>>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        order: query.order,
    };
    validate_page_query(&page)?;

    let filter = ReviewFilter {
        rating: query.rating,
        is_visible: query.is_visible,
    };
    let result = review::find_all(&state.pool, restaurant_id, &filter, &page).await?;
    Ok(Json(result))
}

/// POST /api/v1/restaurants/{restaurantId}/reviews - 创建点评 (每人每店一条)
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<ApiData<Review>>)> {
    validate_rating(payload.rating)?;
    validate_optional_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    let created = review::create(&state.pool, restaurant_id, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/restaurants/{restaurantId}/reviews/{id} - 查询点评
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiData<Review>>> {
    let found = review::find_by_id(&state.pool, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Review {id} not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/restaurants/{restaurantId}/reviews/{id} - 更新点评
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<ApiData<Review>>> {
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }
    validate_optional_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    let updated = review::update(&state.pool, restaurant_id, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/restaurants/{restaurantId}/reviews/{id} - 删除点评 (硬删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    review::delete(&state.pool, restaurant_id, id).await?;
    Ok(message("Review deleted successfully"))
}
