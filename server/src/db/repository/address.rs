//! Address Repository

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use shared::models::{Address, AddressCreate, AddressUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ADDRESS_SELECT: &str = "SELECT id, restaurant_id, street_address, city, state_province, \
    postal_code, country, latitude, longitude, is_main, created_at FROM address";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Address>> {
    ensure_restaurant_exists(pool, restaurant_id).await?;
    let sql = format!(
        "{ADDRESS_SELECT} WHERE restaurant_id = ? ORDER BY is_main DESC, created_at DESC"
    );
    let rows = sqlx::query_as::<_, Address>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<Address>> {
    let sql = format!("{ADDRESS_SELECT} WHERE id = ? AND restaurant_id = ?");
    let row = sqlx::query_as::<_, Address>(&sql)
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create an address. A new main address clears the flag on all siblings
/// first, keeping at most one `is_main` per restaurant.
pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: AddressCreate,
) -> RepoResult<Address> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    let is_main = data.is_main.unwrap_or(false);
    if is_main {
        sqlx::query("UPDATE address SET is_main = 0 WHERE restaurant_id = ? AND is_main = 1")
            .bind(restaurant_id)
            .execute(pool)
            .await?;
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO address (id, restaurant_id, street_address, city, state_province, \
         postal_code, country, latitude, longitude, is_main, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.street_address)
    .bind(data.city)
    .bind(data.state_province)
    .bind(data.postal_code)
    .bind(data.country)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(is_main)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create address".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: AddressUpdate,
) -> RepoResult<Address> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))?;

    if data.is_main == Some(true) {
        sqlx::query(
            "UPDATE address SET is_main = 0 WHERE restaurant_id = ? AND is_main = 1 AND id != ?",
        )
        .bind(restaurant_id)
        .bind(id)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        "UPDATE address SET street_address = COALESCE(?, street_address), \
         city = COALESCE(?, city), state_province = COALESCE(?, state_province), \
         postal_code = COALESCE(?, postal_code), country = COALESCE(?, country), \
         latitude = COALESCE(?, latitude), longitude = COALESCE(?, longitude), \
         is_main = COALESCE(?, is_main) WHERE id = ?",
    )
    .bind(data.street_address)
    .bind(data.city)
    .bind(data.state_province)
    .bind(data.postal_code)
    .bind(data.country)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(data.is_main)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<bool> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Address {id} not found")))?;

    sqlx::query("DELETE FROM address WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}
