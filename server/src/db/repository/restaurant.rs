//! Restaurant Repository

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{
    Address, AddressBrief, CategoryRef, PriceRange, Product, Restaurant, RestaurantCreate,
    RestaurantDetail, RestaurantSummary, RestaurantUpdate,
};
use shared::pagination::{PageQuery, Paginated, SortOrder};
use shared::util::{generate_slug, now_millis, snowflake_id};
use sqlx::SqlitePool;

const RESTAURANT_SELECT: &str = "SELECT id, name, slug, description, phone, email, website, \
    logo_url, cover_image_url, rating, price_range, is_active, opening_year, created_at, \
    updated_at FROM restaurant";

/// Listing filters, all optional.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub rating_min: Option<f64>,
    pub is_active: Option<bool>,
}

fn sort_column(sort_by: Option<&str>) -> RepoResult<&'static str> {
    match sort_by.unwrap_or("createdAt") {
        "name" => Ok("name"),
        "rating" => Ok("rating"),
        "openingYear" => Ok("opening_year"),
        "createdAt" => Ok("created_at"),
        other => Err(RepoError::Validation(format!("Cannot sort by '{other}'"))),
    }
}

pub async fn find_all(
    pool: &SqlitePool,
    filter: &RestaurantFilter,
    page: &PageQuery,
) -> RepoResult<Paginated<RestaurantSummary>> {
    let order = page.order.unwrap_or(SortOrder::Desc);
    let column = sort_column(page.sort_by.as_deref())?;

    let mut where_sql = String::from(" WHERE 1=1");
    let search = filter.search.as_ref().map(|s| format!("%{s}%"));
    let city = filter.city.as_ref().map(|c| format!("%{c}%"));
    if search.is_some() {
        where_sql.push_str(" AND (name LIKE ? OR description LIKE ?)");
    }
    if city.is_some() {
        where_sql.push_str(" AND id IN (SELECT restaurant_id FROM address WHERE city LIKE ?)");
    }
    if filter.category.is_some() {
        where_sql.push_str(
            " AND id IN (SELECT rc.restaurant_id FROM restaurant_category rc \
             JOIN category c ON c.id = rc.category_id WHERE c.slug = ?)",
        );
    }
    if filter.price_range.is_some() {
        where_sql.push_str(" AND price_range = ?");
    }
    if filter.rating_min.is_some() {
        where_sql.push_str(" AND rating >= ?");
    }
    if filter.is_active.is_some() {
        where_sql.push_str(" AND is_active = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM restaurant{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(ref p) = search {
        count_q = count_q.bind(p.clone()).bind(p.clone());
    }
    if let Some(ref c) = city {
        count_q = count_q.bind(c.clone());
    }
    if let Some(ref slug) = filter.category {
        count_q = count_q.bind(slug.clone());
    }
    if let Some(pr) = filter.price_range {
        count_q = count_q.bind(pr);
    }
    if let Some(r) = filter.rating_min {
        count_q = count_q.bind(r);
    }
    if let Some(a) = filter.is_active {
        count_q = count_q.bind(a);
    }
    let total = count_q.fetch_one(pool).await?;

    let rows_sql = format!(
        "{RESTAURANT_SELECT}{where_sql} ORDER BY {column} {} LIMIT ? OFFSET ?",
        order.as_sql()
    );
    let mut rows_q = sqlx::query_as::<_, Restaurant>(&rows_sql);
    if let Some(ref p) = search {
        rows_q = rows_q.bind(p.clone()).bind(p.clone());
    }
    if let Some(ref c) = city {
        rows_q = rows_q.bind(c.clone());
    }
    if let Some(ref slug) = filter.category {
        rows_q = rows_q.bind(slug.clone());
    }
    if let Some(pr) = filter.price_range {
        rows_q = rows_q.bind(pr);
    }
    if let Some(r) = filter.rating_min {
        rows_q = rows_q.bind(r);
    }
    if let Some(a) = filter.is_active {
        rows_q = rows_q.bind(a);
    }
    let restaurants = rows_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let ids: Vec<i64> = restaurants.iter().map(|r| r.id).collect();
    let mut categories = categories_for(pool, &ids).await?;
    let mut addresses = main_addresses_for(pool, &ids).await?;

    let summaries = restaurants
        .into_iter()
        .map(|r| {
            let id = r.id;
            RestaurantSummary {
                restaurant: r,
                categories: categories.remove(&id).unwrap_or_default(),
                address: addresses.remove(&id),
            }
        })
        .collect();

    Ok(Paginated::new(summaries, page.page(), page.limit(), total))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let sql = format!("{RESTAURANT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Restaurant>> {
    let sql = format!("{RESTAURANT_SELECT} WHERE slug = ?");
    let row = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(slug.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Restaurant with categories, all addresses and its ten newest active
/// products.
pub async fn get_detail(pool: &SqlitePool, id: i64) -> RepoResult<RestaurantDetail> {
    let restaurant = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))?;
    build_detail(pool, restaurant).await
}

pub async fn get_detail_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<RestaurantDetail> {
    let restaurant = find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant with slug '{slug}' not found")))?;
    build_detail(pool, restaurant).await
}

async fn build_detail(pool: &SqlitePool, restaurant: Restaurant) -> RepoResult<RestaurantDetail> {
    let id = restaurant.id;
    let mut categories = categories_for(pool, &[id]).await?;

    let addresses = sqlx::query_as::<_, Address>(
        "SELECT id, restaurant_id, street_address, city, state_province, postal_code, country, \
         latitude, longitude, is_main, created_at FROM address WHERE restaurant_id = ? \
         ORDER BY is_main DESC, created_at DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let products = sqlx::query_as::<_, Product>(
        "SELECT id, restaurant_id, name, description, price, image_url, category, is_available, \
         is_active, created_at, updated_at FROM product \
         WHERE restaurant_id = ? AND is_active = 1 ORDER BY created_at DESC LIMIT 10",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(RestaurantDetail {
        restaurant,
        categories: categories.remove(&id).unwrap_or_default(),
        addresses,
        products,
    })
}

/// Create a restaurant. The slug is derived from the name when absent and
/// collisions are rejected. The first entry of `category_ids` becomes the
/// primary category; restaurant and category links are written in one
/// transaction.
pub async fn create(pool: &SqlitePool, data: RestaurantCreate) -> RepoResult<RestaurantSummary> {
    let slug = match data.slug {
        Some(s) => s,
        None => generate_slug(&data.name),
    };

    if find_by_slug(pool, &slug).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "A restaurant with slug '{slug}' already exists"
        )));
    }

    let id = snowflake_id();
    let now = now_millis();
    let price_range = data.price_range.unwrap_or(PriceRange::Moderate);

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO restaurant (id, name, slug, description, phone, email, website, logo_url, \
         cover_image_url, rating, price_range, is_active, opening_year, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, 1, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name)
    .bind(slug)
    .bind(data.description)
    .bind(data.phone)
    .bind(data.email)
    .bind(data.website)
    .bind(data.logo_url)
    .bind(data.cover_image_url)
    .bind(price_range)
    .bind(data.opening_year)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if let Some(category_ids) = data.category_ids {
        insert_category_links(&mut tx, id, &category_ids).await?;
    }
    tx.commit().await?;

    get_summary(pool, id).await
}

/// Update a restaurant. An explicit slug is re-checked for uniqueness
/// (excluding self); a name change alone does not regenerate the slug.
/// When `category_ids` is present the whole category set is replaced in a
/// transaction, first entry primary.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: RestaurantUpdate,
) -> RepoResult<RestaurantSummary> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))?;

    if let Some(ref slug) = data.slug {
        let clash = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM restaurant WHERE slug = ? AND id != ?",
        )
        .bind(slug.clone())
        .bind(id)
        .fetch_one(pool)
        .await?;
        if clash > 0 {
            return Err(RepoError::Duplicate(format!(
                "A restaurant with slug '{slug}' already exists"
            )));
        }
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE restaurant SET name = COALESCE(?, name), slug = COALESCE(?, slug), \
         description = COALESCE(?, description), phone = COALESCE(?, phone), \
         email = COALESCE(?, email), website = COALESCE(?, website), \
         logo_url = COALESCE(?, logo_url), cover_image_url = COALESCE(?, cover_image_url), \
         price_range = COALESCE(?, price_range), opening_year = COALESCE(?, opening_year), \
         is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(data.name)
    .bind(data.slug)
    .bind(data.description)
    .bind(data.phone)
    .bind(data.email)
    .bind(data.website)
    .bind(data.logo_url)
    .bind(data.cover_image_url)
    .bind(data.price_range)
    .bind(data.opening_year)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(category_ids) = data.category_ids {
        sqlx::query("DELETE FROM restaurant_category WHERE restaurant_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_category_links(&mut tx, id, &category_ids).await?;
    }
    tx.commit().await?;

    get_summary(pool, id).await
}

/// Hard delete; owned rows go with it via the store's cascade rules.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Restaurant {id} not found")))?;

    sqlx::query("DELETE FROM restaurant WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

async fn get_summary(pool: &SqlitePool, id: i64) -> RepoResult<RestaurantSummary> {
    let restaurant = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to load restaurant".into()))?;
    let mut categories = categories_for(pool, &[id]).await?;
    let mut addresses = main_addresses_for(pool, &[id]).await?;
    Ok(RestaurantSummary {
        restaurant,
        categories: categories.remove(&id).unwrap_or_default(),
        address: addresses.remove(&id),
    })
}

async fn insert_category_links(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    restaurant_id: i64,
    category_ids: &[i64],
) -> RepoResult<()> {
    for (index, category_id) in category_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO restaurant_category (restaurant_id, category_id, is_primary) \
             VALUES (?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(category_id)
        .bind(index == 0)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct CategoryRefRow {
    restaurant_id: i64,
    id: i64,
    name: String,
    slug: String,
    is_primary: bool,
}

async fn categories_for(
    pool: &SqlitePool,
    restaurant_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<CategoryRef>>> {
    if restaurant_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; restaurant_ids.len()].join(", ");
    let sql = format!(
        "SELECT rc.restaurant_id, c.id, c.name, c.slug, rc.is_primary \
         FROM restaurant_category rc JOIN category c ON c.id = rc.category_id \
         WHERE rc.restaurant_id IN ({placeholders}) ORDER BY rc.is_primary DESC, c.name"
    );
    let mut q = sqlx::query_as::<_, CategoryRefRow>(&sql);
    for id in restaurant_ids {
        q = q.bind(*id);
    }
    let rows = q.fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<CategoryRef>> = HashMap::new();
    for row in rows {
        map.entry(row.restaurant_id).or_default().push(CategoryRef {
            id: row.id,
            name: row.name,
            slug: row.slug,
            is_primary: row.is_primary,
        });
    }
    Ok(map)
}

async fn main_addresses_for(
    pool: &SqlitePool,
    restaurant_ids: &[i64],
) -> RepoResult<HashMap<i64, AddressBrief>> {
    if restaurant_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; restaurant_ids.len()].join(", ");
    let sql = format!(
        "SELECT id, restaurant_id, street_address, city, state_province, postal_code, country, \
         latitude, longitude, is_main, created_at FROM address \
         WHERE restaurant_id IN ({placeholders}) AND is_main = 1"
    );
    let mut q = sqlx::query_as::<_, Address>(&sql);
    for id in restaurant_ids {
        q = q.bind(*id);
    }
    let rows = q.fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|a| (a.restaurant_id, AddressBrief::from(a)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::CategoryCreate;

    async fn test_pool() -> SqlitePool {
        DbService::connect_in_memory().await.unwrap().pool
    }

    fn payload(name: &str) -> RestaurantCreate {
        RestaurantCreate {
            name: name.to_string(),
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
        }
    }

    async fn seed_category(pool: &SqlitePool, name: &str) -> i64 {
        super::super::category::create(
            pool,
            CategoryCreate {
                name: name.to_string(),
                slug: None,
                description: None,
                icon_url: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn create_derives_slug_and_defaults() {
        let pool = test_pool().await;
        let r = create(&pool, payload("La Casa de Toño")).await.unwrap();
        assert_eq!(r.restaurant.slug, "la-casa-de-tono");
        assert_eq!(r.restaurant.price_range, PriceRange::Moderate);
        assert!(r.restaurant.is_active);
        assert_eq!(r.restaurant.rating, 0.0);
    }

    #[tokio::test]
    async fn duplicate_slug_is_conflict() {
        let pool = test_pool().await;
        create(&pool, payload("Sushi Zen")).await.unwrap();
        let err = create(&pool, payload("Sushi Zen")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn first_category_is_primary() {
        let pool = test_pool().await;
        let japonesa = seed_category(&pool, "Japonesa").await;
        let mariscos = seed_category(&pool, "Mariscos").await;

        let mut data = payload("Sushi Zen");
        data.category_ids = Some(vec![japonesa, mariscos]);
        let r = create(&pool, data).await.unwrap();

        assert_eq!(r.categories.len(), 2);
        let primary: Vec<_> = r.categories.iter().filter(|c| c.is_primary).collect();
        assert_eq!(primary.len(), 1);
        assert_eq!(primary[0].id, japonesa);
    }

    #[tokio::test]
    async fn update_replaces_categories() {
        let pool = test_pool().await;
        let japonesa = seed_category(&pool, "Japonesa").await;
        let mariscos = seed_category(&pool, "Mariscos").await;

        let mut data = payload("El Pescador");
        data.category_ids = Some(vec![japonesa]);
        let r = create(&pool, data).await.unwrap();

        let updated = update(
            &pool,
            r.restaurant.id,
            RestaurantUpdate {
                category_ids: Some(vec![mariscos, japonesa]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.categories.len(), 2);
        assert!(
            updated
                .categories
                .iter()
                .any(|c| c.id == mariscos && c.is_primary)
        );
        assert!(
            updated
                .categories
                .iter()
                .any(|c| c.id == japonesa && !c.is_primary)
        );
    }

    #[tokio::test]
    async fn explicit_slug_update_checks_conflicts() {
        let pool = test_pool().await;
        create(&pool, payload("Uno")).await.unwrap();
        let r2 = create(&pool, payload("Dos")).await.unwrap();

        let err = update(
            &pool,
            r2.restaurant.id,
            RestaurantUpdate {
                slug: Some("uno".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // Renaming alone keeps the slug untouched
        let updated = update(
            &pool,
            r2.restaurant.id,
            RestaurantUpdate {
                name: Some("Dos Renombrado".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.restaurant.slug, "dos");
    }

    #[tokio::test]
    async fn filters_and_pagination() {
        let pool = test_pool().await;
        let italiana = seed_category(&pool, "Italiana").await;

        let mut data = payload("La Trattoria");
        data.category_ids = Some(vec![italiana]);
        data.price_range = Some(PriceRange::Upscale);
        create(&pool, data).await.unwrap();
        create(&pool, payload("Burger Palace")).await.unwrap();

        let by_category = find_all(
            &pool,
            &RestaurantFilter {
                category: Some("italiana".to_string()),
                ..Default::default()
            },
            &PageQuery::default(),
        )
        .await
        .unwrap();
        assert_eq!(by_category.pagination.total, 1);
        assert_eq!(by_category.data[0].restaurant.name, "La Trattoria");

        let by_price = find_all(
            &pool,
            &RestaurantFilter {
                price_range: Some(PriceRange::Upscale),
                ..Default::default()
            },
            &PageQuery::default(),
        )
        .await
        .unwrap();
        assert_eq!(by_price.pagination.total, 1);

        let by_search = find_all(
            &pool,
            &RestaurantFilter {
                search: Some("burger".to_string()),
                ..Default::default()
            },
            &PageQuery::default(),
        )
        .await
        .unwrap();
        assert_eq!(by_search.pagination.total, 1);
        assert_eq!(by_search.data[0].restaurant.name, "Burger Palace");
    }

    #[tokio::test]
    async fn unknown_sort_field_is_rejected() {
        let pool = test_pool().await;
        let err = find_all(
            &pool,
            &RestaurantFilter::default(),
            &PageQuery {
                sort_by: Some("password".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_cascades_to_children() {
        let pool = test_pool().await;
        let r = create(&pool, payload("Verde Natural")).await.unwrap();
        let id = r.restaurant.id;

        sqlx::query(
            "INSERT INTO product (id, restaurant_id, name, price, is_available, is_active, \
             created_at, updated_at) VALUES (?, ?, 'Buddha Bowl', 175.0, 1, 1, 0, 0)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

        assert!(delete(&pool, id).await.unwrap());
        let orphans =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product WHERE restaurant_id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(orphans, 0);
    }
}
