//! Reservation Repository
//!
//! Reservation lifecycle: created as `pending`, moved through the status
//! graph via update, soft-cancelled and never physically deleted.

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use chrono::NaiveDate;
use shared::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
use shared::util::{date_to_millis, day_bounds_millis, now_millis, parse_date, snowflake_id};
use sqlx::SqlitePool;
use shared::pagination::{PageQuery, Paginated, SortOrder};

const RESERVATION_SELECT: &str = "SELECT id, restaurant_id, user_id, table_id, guest_name, \
    guest_email, guest_phone, party_size, reservation_date, reservation_time, status, \
    special_requests, created_at, updated_at FROM reservation";

/// Listing filters, all optional.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub restaurant_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<ReservationStatus>,
    pub date: Option<NaiveDate>,
}

fn sort_column(sort_by: Option<&str>) -> RepoResult<&'static str> {
    match sort_by.unwrap_or("reservationDate") {
        "reservationDate" => Ok("reservation_date"),
        "createdAt" => Ok("created_at"),
        "partySize" => Ok("party_size"),
        other => Err(RepoError::Validation(format!("Cannot sort by '{other}'"))),
    }
}

pub async fn find_all(
    pool: &SqlitePool,
    filter: &ReservationFilter,
    page: &PageQuery,
) -> RepoResult<Paginated<Reservation>> {
    let order = page.order.unwrap_or(SortOrder::Asc);
    let column = sort_column(page.sort_by.as_deref())?;

    let mut where_sql = String::from(" WHERE 1=1");
    if filter.restaurant_id.is_some() {
        where_sql.push_str(" AND restaurant_id = ?");
    }
    if filter.user_id.is_some() {
        where_sql.push_str(" AND user_id = ?");
    }
    if filter.status.is_some() {
        where_sql.push_str(" AND status = ?");
    }
    if filter.date.is_some() {
        where_sql.push_str(" AND reservation_date BETWEEN ? AND ?");
    }

    let bounds = filter.date.map(day_bounds_millis);

    let count_sql = format!("SELECT COUNT(*) FROM reservation{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = filter.restaurant_id {
        count_q = count_q.bind(id);
    }
    if let Some(id) = filter.user_id {
        count_q = count_q.bind(id);
    }
    if let Some(status) = filter.status {
        count_q = count_q.bind(status);
    }
    if let Some((start, end)) = bounds {
        count_q = count_q.bind(start).bind(end);
    }
    let total = count_q.fetch_one(pool).await?;

    let rows_sql = format!(
        "{RESERVATION_SELECT}{where_sql} ORDER BY {column} {} LIMIT ? OFFSET ?",
        order.as_sql()
    );
    let mut rows_q = sqlx::query_as::<_, Reservation>(&rows_sql);
    if let Some(id) = filter.restaurant_id {
        rows_q = rows_q.bind(id);
    }
    if let Some(id) = filter.user_id {
        rows_q = rows_q.bind(id);
    }
    if let Some(status) = filter.status {
        rows_q = rows_q.bind(status);
    }
    if let Some((start, end)) = bounds {
        rows_q = rows_q.bind(start).bind(end);
    }
    let rows = rows_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::new(rows, page.page(), page.limit(), total))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("{RESERVATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a reservation with status `pending`. Guest contact fields are
/// stored as given even when a user account is linked.
///
/// No availability check happens here: checking and booking are two
/// separate, non-atomic steps, so two concurrent requests can book the
/// same table and slot. Kept that way on purpose.
pub async fn create(pool: &SqlitePool, data: ReservationCreate) -> RepoResult<Reservation> {
    ensure_restaurant_exists(pool, data.restaurant_id).await?;

    let date_ms = parse_reservation_date(&data.reservation_date)?;
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO reservation (id, restaurant_id, user_id, table_id, guest_name, guest_email, \
         guest_phone, party_size, reservation_date, reservation_time, status, special_requests, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?)",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(data.user_id)
    .bind(data.table_id)
    .bind(data.guest_name)
    .bind(data.guest_email)
    .bind(data.guest_phone)
    .bind(data.party_size)
    .bind(date_ms)
    .bind(data.reservation_time)
    .bind(data.special_requests)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

/// Update a reservation. Status changes must follow the transition graph
/// (same-status writes pass as no-ops). Changing date, time or table does
/// NOT re-run the availability check.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ReservationUpdate,
) -> RepoResult<Reservation> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))?;

    if let Some(next) = data.status
        && !existing.status.can_transition_to(next)
    {
        return Err(RepoError::Validation(format!(
            "Cannot transition reservation from '{}' to '{}'",
            existing.status.as_str(),
            next.as_str()
        )));
    }

    let date_ms = match data.reservation_date {
        Some(ref raw) => Some(parse_reservation_date(raw)?),
        None => None,
    };

    sqlx::query(
        "UPDATE reservation SET table_id = COALESCE(?, table_id), \
         guest_name = COALESCE(?, guest_name), guest_email = COALESCE(?, guest_email), \
         guest_phone = COALESCE(?, guest_phone), party_size = COALESCE(?, party_size), \
         reservation_date = COALESCE(?, reservation_date), \
         reservation_time = COALESCE(?, reservation_time), status = COALESCE(?, status), \
         special_requests = COALESCE(?, special_requests), updated_at = ? WHERE id = ?",
    )
    .bind(data.table_id)
    .bind(data.guest_name)
    .bind(data.guest_email)
    .bind(data.guest_phone)
    .bind(data.party_size)
    .bind(date_ms)
    .bind(data.reservation_time)
    .bind(data.status)
    .bind(data.special_requests)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// Soft-cancel: sets status to `cancelled`, the row stays. Cancelling an
/// already cancelled reservation is a no-op.
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<Reservation> {
    update(
        pool,
        id,
        ReservationUpdate {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
}

fn parse_reservation_date(raw: &str) -> RepoResult<i64> {
    parse_date(raw)
        .map(date_to_millis)
        .ok_or_else(|| RepoError::Validation(format!("Invalid reservation date '{raw}'")))
}
