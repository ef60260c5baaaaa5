//! Review Repository

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use shared::models::{Review, ReviewCreate, ReviewUpdate};
use shared::pagination::{PageQuery, Paginated, SortOrder};
use shared::util::{date_to_millis, now_millis, parse_date, snowflake_id};
use sqlx::SqlitePool;

const REVIEW_SELECT: &str = "SELECT id, restaurant_id, user_id, rating, title, comment, \
    visit_date, is_visible, created_at, updated_at FROM review";

/// Listing filters, all optional.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub rating: Option<i64>,
    pub is_visible: Option<bool>,
}

fn sort_column(sort_by: Option<&str>) -> RepoResult<&'static str> {
    match sort_by.unwrap_or("createdAt") {
        "rating" => Ok("rating"),
        "createdAt" => Ok("created_at"),
        other => Err(RepoError::Validation(format!("Cannot sort by '{other}'"))),
    }
}

pub async fn find_all(
    pool: &SqlitePool,
    restaurant_id: i64,
    filter: &ReviewFilter,
    page: &PageQuery,
) -> RepoResult<Paginated<Review>> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    let order = page.order.unwrap_or(SortOrder::Desc);
    let column = sort_column(page.sort_by.as_deref())?;

    let mut where_sql = String::from(" WHERE restaurant_id = ?");
    if filter.rating.is_some() {
        where_sql.push_str(" AND rating = ?");
    }
    if filter.is_visible.is_some() {
        where_sql.push_str(" AND is_visible = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM review{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(restaurant_id);
    if let Some(r) = filter.rating {
        count_q = count_q.bind(r);
    }
    if let Some(v) = filter.is_visible {
        count_q = count_q.bind(v);
    }
    let total = count_q.fetch_one(pool).await?;

    let rows_sql = format!(
        "{REVIEW_SELECT}{where_sql} ORDER BY {column} {} LIMIT ? OFFSET ?",
        order.as_sql()
    );
    let mut rows_q = sqlx::query_as::<_, Review>(&rows_sql).bind(restaurant_id);
    if let Some(r) = filter.rating {
        rows_q = rows_q.bind(r);
    }
    if let Some(v) = filter.is_visible {
        rows_q = rows_q.bind(v);
    }
    let rows = rows_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::new(rows, page.page(), page.limit(), total))
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE id = ? AND restaurant_id = ?");
    let row = sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a review; a user may post at most one review per restaurant.
pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: ReviewCreate,
) -> RepoResult<Review> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM review WHERE restaurant_id = ? AND user_id = ?",
    )
    .bind(restaurant_id)
    .bind(data.user_id)
    .fetch_one(pool)
    .await?;
    if existing > 0 {
        return Err(RepoError::Duplicate(
            "User has already reviewed this restaurant".to_string(),
        ));
    }

    let visit_date = parse_visit_date(data.visit_date.as_deref())?;
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO review (id, restaurant_id, user_id, rating, title, comment, visit_date, \
         is_visible, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.user_id)
    .bind(data.rating)
    .bind(data.title)
    .bind(data.comment)
    .bind(visit_date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create review".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: ReviewUpdate,
) -> RepoResult<Review> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Review {id} not found")))?;

    let visit_date = parse_visit_date(data.visit_date.as_deref())?;
    sqlx::query(
        "UPDATE review SET rating = COALESCE(?, rating), title = COALESCE(?, title), \
         comment = COALESCE(?, comment), visit_date = COALESCE(?, visit_date), \
         is_visible = COALESCE(?, is_visible), updated_at = ? WHERE id = ?",
    )
    .bind(data.rating)
    .bind(data.title)
    .bind(data.comment)
    .bind(visit_date)
    .bind(data.is_visible)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Review {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<bool> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Review {id} not found")))?;

    sqlx::query("DELETE FROM review WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

fn parse_visit_date(raw: Option<&str>) -> RepoResult<Option<i64>> {
    match raw {
        None => Ok(None),
        Some(value) => parse_date(value)
            .map(date_to_millis)
            .map(Some)
            .ok_or_else(|| RepoError::Validation(format!("Invalid visit date '{value}'"))),
    }
}
