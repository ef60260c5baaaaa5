//! Menu Repository

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use shared::models::{Menu, MenuCreate, MenuUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const MENU_SELECT: &str = "SELECT id, restaurant_id, name, description, is_active, \
    display_order, created_at, updated_at FROM menu";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Menu>> {
    ensure_restaurant_exists(pool, restaurant_id).await?;
    let sql = format!("{MENU_SELECT} WHERE restaurant_id = ? ORDER BY display_order, name");
    let rows = sqlx::query_as::<_, Menu>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<Menu>> {
    let sql = format!("{MENU_SELECT} WHERE id = ? AND restaurant_id = ?");
    let row = sqlx::query_as::<_, Menu>(&sql)
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a menu; names are unique within a restaurant.
pub async fn create(pool: &SqlitePool, restaurant_id: i64, data: MenuCreate) -> RepoResult<Menu> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    if name_exists(pool, restaurant_id, &data.name, None).await? {
        return Err(RepoError::Duplicate(format!(
            "A menu named '{}' already exists in this restaurant",
            data.name
        )));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO menu (id, restaurant_id, name, description, is_active, display_order, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.name)
    .bind(data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.display_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: MenuUpdate,
) -> RepoResult<Menu> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {id} not found")))?;

    if let Some(ref name) = data.name
        && name_exists(pool, restaurant_id, name, Some(id)).await?
    {
        return Err(RepoError::Duplicate(format!(
            "A menu named '{name}' already exists in this restaurant"
        )));
    }

    sqlx::query(
        "UPDATE menu SET name = COALESCE(?, name), description = COALESCE(?, description), \
         is_active = COALESCE(?, is_active), display_order = COALESCE(?, display_order), \
         updated_at = ? WHERE id = ?",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.is_active)
    .bind(data.display_order)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<bool> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {id} not found")))?;

    sqlx::query("DELETE FROM menu WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

async fn name_exists(
    pool: &SqlitePool,
    restaurant_id: i64,
    name: &str,
    exclude: Option<i64>,
) -> RepoResult<bool> {
    let count = match exclude {
        Some(id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM menu WHERE restaurant_id = ? AND name = ? AND id != ?",
            )
            .bind(restaurant_id)
            .bind(name.to_string())
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM menu WHERE restaurant_id = ? AND name = ?",
            )
            .bind(restaurant_id)
            .bind(name.to_string())
            .fetch_one(pool)
            .await?
        }
    };
    Ok(count > 0)
}
