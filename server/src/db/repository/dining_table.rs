//! Dining Table Repository
//!
//! CRUD plus the table-availability check used by the booking flow.

use std::collections::HashSet;

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use chrono::NaiveDate;
use shared::models::{AvailabilityReport, DiningTable, DiningTableCreate, DiningTableUpdate,
    TableAvailability};
use shared::util::{day_bounds_millis, snowflake_id};
use sqlx::SqlitePool;

const TABLE_SELECT: &str = "SELECT id, restaurant_id, table_number, capacity, location, \
    is_available, is_active FROM dining_table";

pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<DiningTable>> {
    ensure_restaurant_exists(pool, restaurant_id).await?;
    let sql = format!("{TABLE_SELECT} WHERE restaurant_id = ? ORDER BY table_number");
    let rows = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let sql = format!("{TABLE_SELECT} WHERE id = ? AND restaurant_id = ?");
    let row = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a dining table; `table_number` is unique within the restaurant.
pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: DiningTableCreate,
) -> RepoResult<DiningTable> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    if number_exists(pool, restaurant_id, &data.table_number, None).await? {
        return Err(RepoError::Duplicate(format!(
            "A table with number '{}' already exists in this restaurant",
            data.table_number
        )));
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO dining_table (id, restaurant_id, table_number, capacity, location, \
         is_available, is_active) VALUES (?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.table_number)
    .bind(data.capacity)
    .bind(data.location)
    .bind(data.is_available.unwrap_or(true))
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: DiningTableUpdate,
) -> RepoResult<DiningTable> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))?;

    if let Some(ref number) = data.table_number
        && number_exists(pool, restaurant_id, number, Some(id)).await?
    {
        return Err(RepoError::Duplicate(format!(
            "A table with number '{number}' already exists in this restaurant"
        )));
    }

    sqlx::query(
        "UPDATE dining_table SET table_number = COALESCE(?, table_number), \
         capacity = COALESCE(?, capacity), location = COALESCE(?, location), \
         is_available = COALESCE(?, is_available), is_active = COALESCE(?, is_active) \
         WHERE id = ?",
    )
    .bind(data.table_number)
    .bind(data.capacity)
    .bind(data.location)
    .bind(data.is_available)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<bool> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))?;

    sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

/// Which tables are free for a date, time slot and optional party size.
///
/// A table is blocked iff an active (pending/confirmed) reservation exists
/// for the same calendar day with exactly the requested `HH:MM` time string
/// and points at that table. Matching is by exact time-string equality, not
/// interval overlap: a reservation at "19:00" does not block "19:15".
/// Reservations without an assigned table block nothing.
///
/// Only `is_active` is consulted on the tables themselves; the
/// `is_available` flag plays no role here.
pub async fn check_availability(
    pool: &SqlitePool,
    restaurant_id: i64,
    date: NaiveDate,
    time: &str,
    party_size: Option<i64>,
) -> RepoResult<AvailabilityReport> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    let mut sql = format!("{TABLE_SELECT} WHERE restaurant_id = ? AND is_active = 1");
    if party_size.is_some() {
        sql.push_str(" AND capacity >= ?");
    }
    sql.push_str(" ORDER BY table_number");

    let mut tables_q = sqlx::query_as::<_, DiningTable>(&sql).bind(restaurant_id);
    if let Some(size) = party_size {
        tables_q = tables_q.bind(size);
    }
    let tables = tables_q.fetch_all(pool).await?;

    let (day_start, day_end) = day_bounds_millis(date);
    let reserved: Vec<i64> = sqlx::query_scalar::<_, i64>(
        "SELECT table_id FROM reservation WHERE restaurant_id = ? \
         AND reservation_date BETWEEN ? AND ? AND reservation_time = ? \
         AND status IN ('pending', 'confirmed') AND table_id IS NOT NULL",
    )
    .bind(restaurant_id)
    .bind(day_start)
    .bind(day_end)
    .bind(time.to_string())
    .fetch_all(pool)
    .await?;
    let reserved: HashSet<i64> = reserved.into_iter().collect();

    let total_tables = tables.len() as i64;
    let tables: Vec<TableAvailability> = tables
        .into_iter()
        .map(|table| {
            let available_for_time = !reserved.contains(&table.id);
            TableAvailability {
                table,
                available_for_time,
            }
        })
        .collect();
    let available_count = tables.iter().filter(|t| t.available_for_time).count() as i64;

    Ok(AvailabilityReport {
        date: date.format("%Y-%m-%d").to_string(),
        time: time.to_string(),
        party_size,
        total_tables,
        available_count,
        tables,
    })
}

async fn number_exists(
    pool: &SqlitePool,
    restaurant_id: i64,
    table_number: &str,
    exclude: Option<i64>,
) -> RepoResult<bool> {
    let count = match exclude {
        Some(id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM dining_table WHERE restaurant_id = ? AND table_number = ? \
                 AND id != ?",
            )
            .bind(restaurant_id)
            .bind(table_number.to_string())
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM dining_table WHERE restaurant_id = ? AND table_number = ?",
            )
            .bind(restaurant_id)
            .bind(table_number.to_string())
            .fetch_one(pool)
            .await?
        }
    };
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::RestaurantCreate;
    use shared::util::{date_to_millis, now_millis, parse_date};

    async fn setup() -> (SqlitePool, i64) {
        let pool = DbService::connect_in_memory().await.unwrap().pool;
        let r = super::super::restaurant::create(
            &pool,
            RestaurantCreate {
                name: "La Casa de Tono".to_string(),
                slug: None,
                description: None,
                phone: None,
                email: None,
                website: None,
                logo_url: None,
                cover_image_url: None,
                price_range: None,
                opening_year: None,
                category_ids: None,
            },
        )
        .await
        .unwrap();
        (pool, r.restaurant.id)
    }

    fn payload(number: &str, capacity: i64) -> DiningTableCreate {
        DiningTableCreate {
            table_number: number.to_string(),
            capacity,
            location: Some("Interior".to_string()),
            is_available: None,
        }
    }

    async fn insert_reservation(
        pool: &SqlitePool,
        restaurant_id: i64,
        table_id: Option<i64>,
        date: &str,
        time: &str,
        status: &str,
    ) {
        let date_ms = date_to_millis(parse_date(date).unwrap());
        let now = now_millis();
        sqlx::query(
            "INSERT INTO reservation (id, restaurant_id, table_id, guest_name, guest_email, \
             guest_phone, party_size, reservation_date, reservation_time, status, created_at, \
             updated_at) VALUES (?, ?, ?, 'Ana', 'ana@example.com', '5550001', 4, ?, ?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(restaurant_id)
        .bind(table_id)
        .bind(date_ms)
        .bind(time.to_string())
        .bind(status.to_string())
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn duplicate_table_number_is_conflict() {
        let (pool, rid) = setup().await;
        create(&pool, rid, payload("M-01", 4)).await.unwrap();
        let err = create(&pool, rid, payload("M-01", 6)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn free_table_is_available() {
        let (pool, rid) = setup().await;
        let t = create(&pool, rid, payload("M-01", 4)).await.unwrap();

        let report = check_availability(
            &pool,
            rid,
            parse_date("2024-12-25").unwrap(),
            "19:00",
            Some(4),
        )
        .await
        .unwrap();

        assert_eq!(report.total_tables, 1);
        assert_eq!(report.available_count, 1);
        assert_eq!(report.tables[0].table.id, t.id);
        assert!(report.tables[0].available_for_time);
    }

    #[tokio::test]
    async fn confirmed_reservation_blocks_table() {
        let (pool, rid) = setup().await;
        let t = create(&pool, rid, payload("M-01", 4)).await.unwrap();
        insert_reservation(&pool, rid, Some(t.id), "2024-12-25", "19:00", "confirmed").await;

        let report = check_availability(
            &pool,
            rid,
            parse_date("2024-12-25").unwrap(),
            "19:00",
            Some(4),
        )
        .await
        .unwrap();

        assert_eq!(report.available_count, 0);
        assert!(!report.tables[0].available_for_time);
    }

    #[tokio::test]
    async fn cancelled_reservation_does_not_block() {
        let (pool, rid) = setup().await;
        let t = create(&pool, rid, payload("M-01", 4)).await.unwrap();
        insert_reservation(&pool, rid, Some(t.id), "2024-12-25", "19:00", "cancelled").await;

        let report =
            check_availability(&pool, rid, parse_date("2024-12-25").unwrap(), "19:00", None)
                .await
                .unwrap();
        assert_eq!(report.available_count, 1);
    }

    #[tokio::test]
    async fn time_match_is_exact_string_equality() {
        let (pool, rid) = setup().await;
        let t = create(&pool, rid, payload("M-01", 4)).await.unwrap();
        insert_reservation(&pool, rid, Some(t.id), "2024-12-25", "19:00", "confirmed").await;

        // A 19:00 reservation does not block the 19:15 slot
        let report =
            check_availability(&pool, rid, parse_date("2024-12-25").unwrap(), "19:15", None)
                .await
                .unwrap();
        assert_eq!(report.available_count, 1);

        // Nor does it block 19:00 on another day
        let report =
            check_availability(&pool, rid, parse_date("2024-12-26").unwrap(), "19:00", None)
                .await
                .unwrap();
        assert_eq!(report.available_count, 1);
    }

    #[tokio::test]
    async fn reservation_without_table_blocks_nothing() {
        let (pool, rid) = setup().await;
        create(&pool, rid, payload("M-01", 4)).await.unwrap();
        insert_reservation(&pool, rid, None, "2024-12-25", "19:00", "pending").await;

        let report =
            check_availability(&pool, rid, parse_date("2024-12-25").unwrap(), "19:00", None)
                .await
                .unwrap();
        assert_eq!(report.available_count, 1);
    }

    #[tokio::test]
    async fn party_size_filters_by_capacity() {
        let (pool, rid) = setup().await;
        create(&pool, rid, payload("M-01", 2)).await.unwrap();
        create(&pool, rid, payload("M-02", 6)).await.unwrap();

        let report = check_availability(
            &pool,
            rid,
            parse_date("2024-12-25").unwrap(),
            "19:00",
            Some(4),
        )
        .await
        .unwrap();
        assert_eq!(report.total_tables, 1);
        assert_eq!(report.tables[0].table.table_number, "M-02");
    }

    #[tokio::test]
    async fn availability_ignores_is_available_flag() {
        // Only is_active gates the availability check; is_available is a
        // separate flag that the check deliberately does not consult.
        let (pool, rid) = setup().await;
        let t = create(&pool, rid, payload("M-01", 4)).await.unwrap();
        update(
            &pool,
            rid,
            t.id,
            DiningTableUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let report =
            check_availability(&pool, rid, parse_date("2024-12-25").unwrap(), "19:00", None)
                .await
                .unwrap();
        assert_eq!(report.available_count, 1);

        // Deactivated tables on the other hand disappear entirely
        update(
            &pool,
            rid,
            t.id,
            DiningTableUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let report =
            check_availability(&pool, rid, parse_date("2024-12-25").unwrap(), "19:00", None)
                .await
                .unwrap();
        assert_eq!(report.total_tables, 0);
    }

    #[tokio::test]
    async fn unknown_restaurant_is_not_found() {
        let pool = DbService::connect_in_memory().await.unwrap().pool;
        let err = check_availability(&pool, 7, parse_date("2024-12-25").unwrap(), "19:00", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
