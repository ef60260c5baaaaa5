//! Product Repository

use super::{RepoError, RepoResult, ensure_restaurant_exists};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::pagination::{PageQuery, Paginated, SortOrder};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, restaurant_id, name, description, price, image_url, \
    category, is_available, is_active, created_at, updated_at FROM product";

/// Listing filters, all optional.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

fn sort_column(sort_by: Option<&str>) -> RepoResult<&'static str> {
    match sort_by.unwrap_or("createdAt") {
        "name" => Ok("name"),
        "price" => Ok("price"),
        "createdAt" => Ok("created_at"),
        other => Err(RepoError::Validation(format!("Cannot sort by '{other}'"))),
    }
}

pub async fn find_all(
    pool: &SqlitePool,
    restaurant_id: i64,
    filter: &ProductFilter,
    page: &PageQuery,
) -> RepoResult<Paginated<Product>> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    let order = page.order.unwrap_or(SortOrder::Desc);
    let column = sort_column(page.sort_by.as_deref())?;

    let mut where_sql = String::from(" WHERE restaurant_id = ?");
    let search = filter.search.as_ref().map(|s| format!("%{s}%"));
    let category = filter.category.as_ref().map(|c| format!("%{c}%"));
    if search.is_some() {
        where_sql.push_str(" AND (name LIKE ? OR description LIKE ?)");
    }
    if category.is_some() {
        where_sql.push_str(" AND category LIKE ?");
    }
    if filter.is_available.is_some() {
        where_sql.push_str(" AND is_available = ?");
    }
    if filter.is_active.is_some() {
        where_sql.push_str(" AND is_active = ?");
    }
    if filter.price_min.is_some() {
        where_sql.push_str(" AND price >= ?");
    }
    if filter.price_max.is_some() {
        where_sql.push_str(" AND price <= ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM product{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(restaurant_id);
    if let Some(ref p) = search {
        count_q = count_q.bind(p.clone()).bind(p.clone());
    }
    if let Some(ref c) = category {
        count_q = count_q.bind(c.clone());
    }
    if let Some(v) = filter.is_available {
        count_q = count_q.bind(v);
    }
    if let Some(v) = filter.is_active {
        count_q = count_q.bind(v);
    }
    if let Some(v) = filter.price_min {
        count_q = count_q.bind(v);
    }
    if let Some(v) = filter.price_max {
        count_q = count_q.bind(v);
    }
    let total = count_q.fetch_one(pool).await?;

    let rows_sql = format!(
        "{PRODUCT_SELECT}{where_sql} ORDER BY {column} {} LIMIT ? OFFSET ?",
        order.as_sql()
    );
    let mut rows_q = sqlx::query_as::<_, Product>(&rows_sql).bind(restaurant_id);
    if let Some(ref p) = search {
        rows_q = rows_q.bind(p.clone()).bind(p.clone());
    }
    if let Some(ref c) = category {
        rows_q = rows_q.bind(c.clone());
    }
    if let Some(v) = filter.is_available {
        rows_q = rows_q.bind(v);
    }
    if let Some(v) = filter.is_active {
        rows_q = rows_q.bind(v);
    }
    if let Some(v) = filter.price_min {
        rows_q = rows_q.bind(v);
    }
    if let Some(v) = filter.price_max {
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
) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ? AND restaurant_id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: ProductCreate,
) -> RepoResult<Product> {
    ensure_restaurant_exists(pool, restaurant_id).await?;

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO product (id, restaurant_id, name, description, price, image_url, category, \
         is_available, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .bind(data.image_url)
    .bind(data.category)
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<Product> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    sqlx::query(
        "UPDATE product SET name = COALESCE(?, name), description = COALESCE(?, description), \
         price = COALESCE(?, price), image_url = COALESCE(?, image_url), \
         category = COALESCE(?, category), is_available = COALESCE(?, is_available), \
         is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .bind(data.image_url)
    .bind(data.category)
    .bind(data.is_available)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<bool> {
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::RestaurantCreate;

    async fn setup() -> (SqlitePool, i64) {
        let pool = DbService::connect_in_memory().await.unwrap().pool;
        let r = super::super::restaurant::create(
            &pool,
            RestaurantCreate {
                name: "Cevicheria Lima".to_string(),
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

    fn payload(name: &str, price: f64, category: &str) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            description: None,
            price,
            image_url: None,
            category: Some(category.to_string()),
            is_available: None,
        }
    }

    #[tokio::test]
    async fn price_range_filter() {
        let (pool, rid) = setup().await;
        create(&pool, rid, payload("Ceviche Clasico", 225.0, "plato fuerte"))
            .await
            .unwrap();
        create(&pool, rid, payload("Pisco Sour", 145.0, "bebida"))
            .await
            .unwrap();
        create(&pool, rid, payload("Lomo Saltado", 275.0, "plato fuerte"))
            .await
            .unwrap();

        let filter = ProductFilter {
            price_min: Some(200.0),
            price_max: Some(250.0),
            ..Default::default()
        };
        let result = find_all(&pool, rid, &filter, &PageQuery::default())
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.data[0].name, "Ceviche Clasico");
    }

    #[tokio::test]
    async fn category_label_filter() {
        let (pool, rid) = setup().await;
        create(&pool, rid, payload("Causa Limena", 155.0, "entrada"))
            .await
            .unwrap();
        create(&pool, rid, payload("Chicha Morada", 45.0, "bebida"))
            .await
            .unwrap();

        let filter = ProductFilter {
            category: Some("bebida".to_string()),
            ..Default::default()
        };
        let result = find_all(&pool, rid, &filter, &PageQuery::default())
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.data[0].name, "Chicha Morada");
    }

    #[tokio::test]
    async fn update_and_soft_flags() {
        let (pool, rid) = setup().await;
        let p = create(&pool, rid, payload("Tiradito", 245.0, "entrada"))
            .await
            .unwrap();
        assert!(p.is_available);
        assert!(p.is_active);

        let updated = update(
            &pool,
            rid,
            p.id,
            ProductUpdate {
                is_available: Some(false),
                price: Some(255.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.is_available);
        assert_eq!(updated.price, 255.0);
    }

    #[tokio::test]
    async fn scoped_to_restaurant() {
        let (pool, rid) = setup().await;
        let p = create(&pool, rid, payload("Ceviche", 225.0, "plato fuerte"))
            .await
            .unwrap();
        // Wrong restaurant scope does not see it
        assert!(find_by_id(&pool, rid + 1, p.id).await.unwrap().is_none());
    }
}
