//! Schedule Repository

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use shared::models::{Schedule, ScheduleCreate, ScheduleUpdate};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const SCHEDULE_SELECT: &str = "SELECT id, restaurant_id, day_of_week, open_time, close_time, \
    is_closed FROM schedule";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Schedule>> {
    ensure_restaurant_exists(pool, restaurant_id).await?;
    let sql = format!("{SCHEDULE_SELECT} WHERE restaurant_id = ? ORDER BY day_of_week");
    let rows = sqlx::query_as::<_, Schedule>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<Schedule>> {
    let sql = format!("{SCHEDULE_SELECT} WHERE id = ? AND restaurant_id = ?");
    let row = sqlx::query_as::<_, Schedule>(&sql)
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a schedule entry; one per `(restaurant, day_of_week)`.
pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: ScheduleCreate,
) -> RepoResult<Schedule> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    if day_exists(pool, restaurant_id, data.day_of_week, None).await? {
        return Err(RepoError::Duplicate(format!(
            "A schedule for day {} already exists for this restaurant",
            data.day_of_week
        )));
    }

    let is_closed = data.is_closed.unwrap_or(false);
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO schedule (id, restaurant_id, day_of_week, open_time, close_time, is_closed) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.day_of_week)
    .bind(if is_closed { None } else { data.open_time })
    .bind(if is_closed { None } else { data.close_time })
    .bind(is_closed)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create schedule".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: ScheduleUpdate,
) -> RepoResult<Schedule> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Schedule {id} not found")))?;

    if let Some(day) = data.day_of_week
        && day_exists(pool, restaurant_id, day, Some(id)).await?
    {
        return Err(RepoError::Duplicate(format!(
            "A schedule for day {day} already exists for this restaurant"
        )));
    }

    sqlx::query(
        "UPDATE schedule SET day_of_week = COALESCE(?, day_of_week), \
         open_time = COALESCE(?, open_time), close_time = COALESCE(?, close_time), \
         is_closed = COALESCE(?, is_closed) WHERE id = ?",
    )
    .bind(data.day_of_week)
    .bind(data.open_time)
    .bind(data.close_time)
    .bind(data.is_closed)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Schedule {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<bool> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Schedule {id} not found")))?;

    sqlx::query("DELETE FROM schedule WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

async fn day_exists(
    pool: &SqlitePool,
    restaurant_id: i64,
    day_of_week: i64,
    exclude: Option<i64>,
) -> RepoResult<bool> {
    let count = match exclude {
        Some(id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM schedule WHERE restaurant_id = ? AND day_of_week = ? \
                 AND id != ?",
            )
            .bind(restaurant_id)
            .bind(day_of_week)
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM schedule WHERE restaurant_id = ? AND day_of_week = ?",
            )
            .bind(restaurant_id)
            .bind(day_of_week)
            .fetch_one(pool)
            .await?
        }
    };
    Ok(count > 0)
}
