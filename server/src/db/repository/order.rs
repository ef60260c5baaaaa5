//! Order Repository
//!
//! Order creation computes line subtotals, the 16% tax and the grand total
//! once, allocates a human-readable order number and persists the order
//! with all its items in a single transaction. Totals are never recomputed
//! afterwards.

use std::collections::HashMap;

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use crate::money;
use shared::models::{Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate, OrderWithItems};
use shared::pagination::{PageQuery, Paginated, SortOrder};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, restaurant_id, user_id, table_id, order_number, status, \
    subtotal, tax, total, notes, created_at, updated_at FROM customer_order";

const ITEM_SELECT: &str = "SELECT id, order_id, product_id, quantity, unit_price, subtotal, \
    notes FROM order_item";

const ORDER_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Listing filters, all optional.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub restaurant_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

fn sort_column(sort_by: Option<&str>) -> RepoResult<&'static str> {
    match sort_by.unwrap_or("createdAt") {
        "createdAt" => Ok("created_at"),
        "total" => Ok("total"),
        "orderNumber" => Ok("order_number"),
        other => Err(RepoError::Validation(format!("Cannot sort by '{other}'"))),
    }
}

pub async fn find_all(
    pool: &SqlitePool,
    filter: &OrderFilter,
    page: &PageQuery,
) -> RepoResult<Paginated<OrderWithItems>> {
    let order = page.order.unwrap_or(SortOrder::Desc);
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

    let count_sql = format!("SELECT COUNT(*) FROM customer_order{where_sql}");
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
    let total = count_q.fetch_one(pool).await?;

    let rows_sql = format!(
        "{ORDER_SELECT}{where_sql} ORDER BY {column} {} LIMIT ? OFFSET ?",
        order.as_sql()
    );
    let mut rows_q = sqlx::query_as::<_, Order>(&rows_sql);
    if let Some(id) = filter.restaurant_id {
        rows_q = rows_q.bind(id);
    }
    if let Some(id) = filter.user_id {
        rows_q = rows_q.bind(id);
    }
    if let Some(status) = filter.status {
        rows_q = rows_q.bind(status);
    }
    let orders = rows_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut items = items_for(pool, &ids).await?;
    let rows = orders
        .into_iter()
        .map(|o| {
            let id = o.id;
            OrderWithItems {
                order: o,
                items: items.remove(&id).unwrap_or_default(),
            }
        })
        .collect();

    Ok(Paginated::new(rows, page.page(), page.limit(), total))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithItems>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(order) = order else {
        return Ok(None);
    };
    let mut items = items_for(pool, &[id]).await?;
    Ok(Some(OrderWithItems {
        order,
        items: items.remove(&id).unwrap_or_default(),
    }))
}

/// Create an order with its items in one transaction.
///
/// Unit prices come from the request as submitted: they are snapshots the
/// client took from the menu, not re-read from the product rows.
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<OrderWithItems> {
    ensure_restaurant_exists(pool, data.restaurant_id).await?;

    let totals = money::order_totals(&data.items);
    let id = snowflake_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;
    let order_number = allocate_order_number(&mut tx).await?;

    sqlx::query(
        "INSERT INTO customer_order (id, restaurant_id, user_id, table_id, order_number, status, \
         subtotal, tax, total, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(data.user_id)
    .bind(data.table_id)
    .bind(order_number)
    .bind(totals.subtotal)
    .bind(totals.tax)
    .bind(totals.total)
    .bind(data.notes)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in &data.items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, quantity, unit_price, subtotal, \
             notes) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(money::line_subtotal(item.quantity, item.unit_price))
        .bind(item.notes.clone())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Update order status and/or notes. Status changes must follow the
/// transition graph; same-status writes pass as no-ops. Items and totals
/// are immutable after creation.
pub async fn update(pool: &SqlitePool, id: i64, data: OrderUpdate) -> RepoResult<OrderWithItems> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if let Some(next) = data.status
        && !existing.order.status.can_transition_to(next)
    {
        return Err(RepoError::Validation(format!(
            "Cannot transition order from '{}' to '{}'",
            existing.order.status.as_str(),
            next.as_str()
        )));
    }

    sqlx::query(
        "UPDATE customer_order SET status = COALESCE(?, status), notes = COALESCE(?, notes), \
         updated_at = ? WHERE id = ?",
    )
    .bind(data.status)
    .bind(data.notes)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Soft-cancel: sets status to `cancelled`, order and items stay.
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<OrderWithItems> {
    update(
        pool,
        id,
        OrderUpdate {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
}

/// Allocate a unique `ORD-XXXXXX` order number (6 base-36 uppercase
/// chars). On collision a fresh token is drawn; with ~2.2e9 possible
/// tokens the loop terminates in one round in practice, but it carries no
/// retry bound.
async fn allocate_order_number(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
) -> RepoResult<String> {
    loop {
        let candidate = random_order_number();
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customer_order WHERE order_number = ?",
        )
        .bind(candidate.clone())
        .fetch_one(&mut **tx)
        .await?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
}

fn random_order_number() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let token: String = (0..6)
        .map(|_| ORDER_NUMBER_CHARSET[rng.gen_range(0..ORDER_NUMBER_CHARSET.len())] as char)
        .collect();
    format!("ORD-{token}")
}

async fn items_for(
    pool: &SqlitePool,
    order_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<OrderItem>>> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; order_ids.len()].join(", ");
    let sql = format!("{ITEM_SELECT} WHERE order_id IN ({placeholders}) ORDER BY id");
    let mut q = sqlx::query_as::<_, OrderItem>(&sql);
    for id in order_ids {
        q = q.bind(*id);
    }
    let rows = q.fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in rows {
        map.entry(item.order_id).or_default().push(item);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{OrderItemInput, ProductCreate, RestaurantCreate};

    async fn setup() -> (SqlitePool, i64, i64) {
        let pool = DbService::connect_in_memory().await.unwrap().pool;
        let r = super::super::restaurant::create(
            &pool,
            RestaurantCreate {
                name: "Burger Palace".to_string(),
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
        let product = super::super::product::create(
            &pool,
            r.restaurant.id,
            ProductCreate {
                name: "Classic Burger".to_string(),
                description: None,
                price: 100.0,
                image_url: None,
                category: Some("plato fuerte".to_string()),
                is_available: None,
            },
        )
        .await
        .unwrap();
        (pool, r.restaurant.id, product.id)
    }

    fn payload(restaurant_id: i64, items: Vec<OrderItemInput>) -> OrderCreate {
        OrderCreate {
            restaurant_id,
            user_id: None,
            table_id: None,
            notes: None,
            items,
        }
    }

    fn item(product_id: i64, quantity: i64, unit_price: f64) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
            unit_price,
            notes: None,
        }
    }

    fn assert_order_number_format(number: &str) {
        let token = number.strip_prefix("ORD-").expect("missing ORD- prefix");
        assert_eq!(token.len(), 6, "token length in {number}");
        assert!(
            token
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
            "bad charset in {number}"
        );
    }

    #[tokio::test]
    async fn totals_reference_scenario() {
        let (pool, rid, pid) = setup().await;
        let order = create(&pool, payload(rid, vec![item(pid, 2, 100.0)]))
            .await
            .unwrap();

        assert_eq!(order.order.subtotal, 200.0);
        assert_eq!(order.order.tax, 32.0);
        assert_eq!(order.order.total, 232.0);
        assert_eq!(order.order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].subtotal, 200.0);
        assert_order_number_format(&order.order.order_number);
    }

    #[tokio::test]
    async fn order_numbers_are_unique() {
        let (pool, rid, pid) = setup().await;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..10 {
            let order = create(&pool, payload(rid, vec![item(pid, 1, 50.0)]))
                .await
                .unwrap();
            assert_order_number_format(&order.order.order_number);
            assert!(seen.insert(order.order.order_number.clone()));
        }
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_keeps_items() {
        let (pool, rid, pid) = setup().await;
        let order = create(&pool, payload(rid, vec![item(pid, 3, 10.99)]))
            .await
            .unwrap();

        let cancelled = cancel(&pool, order.order.id).await.unwrap();
        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);

        let again = cancel(&pool, order.order.id).await.unwrap();
        assert_eq!(again.order.status, OrderStatus::Cancelled);

        let reloaded = find_by_id(&pool, order.order.id).await.unwrap().unwrap();
        assert_eq!(reloaded.items.len(), 1);
        // Totals stay frozen after cancellation
        assert_eq!(reloaded.order.subtotal, 32.97);
        assert_eq!(reloaded.order.tax, 5.28);
        assert_eq!(reloaded.order.total, 38.25);
    }

    #[tokio::test]
    async fn status_graph_is_enforced() {
        let (pool, rid, pid) = setup().await;
        let order = create(&pool, payload(rid, vec![item(pid, 1, 100.0)]))
            .await
            .unwrap();
        let id = order.order.id;

        let step = |status| OrderUpdate {
            status: Some(status),
            ..Default::default()
        };

        update(&pool, id, step(OrderStatus::Preparing)).await.unwrap();
        update(&pool, id, step(OrderStatus::Ready)).await.unwrap();

        // ready cannot go back to preparing
        let err = update(&pool, id, step(OrderStatus::Preparing))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let delivered = update(&pool, id, step(OrderStatus::Delivered)).await.unwrap();
        assert_eq!(delivered.order.status, OrderStatus::Delivered);

        // delivered is terminal
        let err = cancel(&pool, id).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn create_requires_restaurant() {
        let pool = DbService::connect_in_memory().await.unwrap().pool;
        let err = create(&pool, payload(1234, vec![item(1, 1, 10.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let (pool, rid, _) = setup().await;
        let err = create(&pool, payload(rid, vec![item(424242, 1, 10.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn list_filters_by_status_and_user() {
        let (pool, rid, pid) = setup().await;
        sqlx::query(
            "INSERT INTO user (id, email, first_name, last_name, created_at, updated_at) \
             VALUES (7, 'maria@example.com', 'Maria', 'Lopez', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let mut with_user = payload(rid, vec![item(pid, 1, 100.0)]);
        with_user.user_id = Some(7);
        let mine = create(&pool, with_user).await.unwrap();
        create(&pool, payload(rid, vec![item(pid, 2, 50.0)]))
            .await
            .unwrap();
        cancel(&pool, mine.order.id).await.unwrap();

        let by_user = find_all(
            &pool,
            &OrderFilter {
                user_id: Some(7),
                ..Default::default()
            },
            &PageQuery::default(),
        )
        .await
        .unwrap();
        assert_eq!(by_user.pagination.total, 1);
        assert_eq!(by_user.data[0].order.id, mine.order.id);

        let cancelled = find_all(
            &pool,
            &OrderFilter {
                restaurant_id: Some(rid),
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
            &PageQuery::default(),
        )
        .await
        .unwrap();
        assert_eq!(cancelled.pagination.total, 1);
    }
}
