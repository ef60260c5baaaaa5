//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_page_query,
    validate_required_text,
};
use crate::utils::{ApiData, AppError, AppResult, MessageResponse, data, message};
use shared::models::{CategoryCreate, CategoryUpdate, CategoryWithCount};
use shared::pagination::{PageQuery, Paginated, SortOrder};

/// Query params for listing categories
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
}

/// GET /api/v1/categories - 分页列出分类
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<CategoryWithCount>>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
        sort_by: query.sort_by,
        order: query.order,
    };
    validate_page_query(&page)?;

    let result = category::find_all(&state.pool, query.search.as_deref(), &page).await?;
    Ok(Json(result))
}

/// POST /api/v1/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<ApiData<CategoryWithCount>>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.slug, "slug", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.icon_url, "iconUrl", MAX_URL_LEN)?;

    let created = category::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, data(created)))
}

/// GET /api/v1/categories/{id} - 按 ID 查询分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiData<CategoryWithCount>>> {
    let found = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;
    Ok(data(found))
}

/// GET /api/v1/categories/slug/{slug} - 按 slug 查询分类
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiData<CategoryWithCount>>> {
    let found = category::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category with slug '{slug}' not found")))?;
    Ok(data(found))
}

/// PATCH /api/v1/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiData<CategoryWithCount>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref slug) = payload.slug {
        validate_required_text(slug, "slug", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.icon_url, "iconUrl", MAX_URL_LEN)?;

    let updated = category::update(&state.pool, id, payload).await?;
    Ok(data(updated))
}

/// DELETE /api/v1/categories/{id} - 删除分类
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    category::delete(&state.pool, id).await?;
    Ok(message("Category deleted successfully"))
}
