//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{CategoryCreate, CategoryUpdate, CategoryWithCount};
use shared::pagination::{PageQuery, Paginated, SortOrder};
use shared::util::{generate_slug, now_millis, snowflake_id};
use sqlx::SqlitePool;

const CATEGORY_SELECT: &str = "SELECT c.id, c.name, c.slug, c.description, c.icon_url, \
    (SELECT COUNT(*) FROM restaurant_category rc WHERE rc.category_id = c.id) AS restaurant_count, \
    c.created_at FROM category c";

fn sort_column(sort_by: Option<&str>) -> RepoResult<&'static str> {
    match sort_by.unwrap_or("name") {
        "name" => Ok("c.name"),
        "createdAt" => Ok("c.created_at"),
        other => Err(RepoError::Validation(format!("Cannot sort by '{other}'"))),
    }
}

pub async fn find_all(
    pool: &SqlitePool,
    search: Option<&str>,
    page: &PageQuery,
) -> RepoResult<Paginated<CategoryWithCount>> {
    let order = page.order.unwrap_or(SortOrder::Asc);
    let column = sort_column(page.sort_by.as_deref())?;

    let mut where_sql = String::new();
    let pattern = search.map(|s| format!("%{s}%"));
    if pattern.is_some() {
        where_sql.push_str(" WHERE (c.name LIKE ? OR c.description LIKE ?)");
    }

    let count_sql = format!("SELECT COUNT(*) FROM category c{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(ref p) = pattern {
        count_q = count_q.bind(p.clone()).bind(p.clone());
    }
    let total = count_q.fetch_one(pool).await?;

    let rows_sql = format!(
        "{CATEGORY_SELECT}{where_sql} ORDER BY {column} {} LIMIT ? OFFSET ?",
        order.as_sql()
    );
    let mut rows_q = sqlx::query_as::<_, CategoryWithCount>(&rows_sql);
    if let Some(ref p) = pattern {
        rows_q = rows_q.bind(p.clone()).bind(p.clone());
    }
    let rows = rows_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::new(rows, page.page(), page.limit(), total))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CategoryWithCount>> {
    let sql = format!("{CATEGORY_SELECT} WHERE c.id = ?");
    let row = sqlx::query_as::<_, CategoryWithCount>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<CategoryWithCount>> {
    let sql = format!("{CATEGORY_SELECT} WHERE c.slug = ?");
    let row = sqlx::query_as::<_, CategoryWithCount>(&sql)
        .bind(slug.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a category. The slug is derived from the name when absent;
/// both slug and name collisions are rejected, never auto-suffixed.
pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<CategoryWithCount> {
    let slug = match data.slug {
        Some(s) => s,
        None => generate_slug(&data.name),
    };

    if slug_exists(pool, &slug, None).await? {
        return Err(RepoError::Duplicate(format!(
            "A category with slug '{slug}' already exists"
        )));
    }
    if name_exists(pool, &data.name, None).await? {
        return Err(RepoError::Duplicate(format!(
            "A category named '{}' already exists",
            data.name
        )));
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO category (id, name, slug, description, icon_url, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name)
    .bind(slug)
    .bind(data.description)
    .bind(data.icon_url)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: CategoryUpdate,
) -> RepoResult<CategoryWithCount> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    if let Some(ref slug) = data.slug
        && slug_exists(pool, slug, Some(id)).await?
    {
        return Err(RepoError::Duplicate(format!(
            "A category with slug '{slug}' already exists"
        )));
    }
    if let Some(ref name) = data.name
        && name_exists(pool, name, Some(id)).await?
    {
        return Err(RepoError::Duplicate(format!(
            "A category named '{name}' already exists"
        )));
    }

    sqlx::query(
        "UPDATE category SET name = COALESCE(?, name), slug = COALESCE(?, slug), \
         description = COALESCE(?, description), icon_url = COALESCE(?, icon_url) WHERE id = ?",
    )
    .bind(data.name)
    .bind(data.slug)
    .bind(data.description)
    .bind(data.icon_url)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

async fn slug_exists(pool: &SqlitePool, slug: &str, exclude: Option<i64>) -> RepoResult<bool> {
    let count = match exclude {
        Some(id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM category WHERE slug = ? AND id != ?",
            )
            .bind(slug.to_string())
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM category WHERE slug = ?")
            .bind(slug.to_string())
            .fetch_one(pool)
            .await?,
    };
    Ok(count > 0)
}

async fn name_exists(pool: &SqlitePool, name: &str, exclude: Option<i64>) -> RepoResult<bool> {
    let count = match exclude {
        Some(id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM category WHERE name = ? AND id != ?",
            )
            .bind(name.to_string())
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM category WHERE name = ?")
            .bind(name.to_string())
            .fetch_one(pool)
            .await?,
    };
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn test_pool() -> SqlitePool {
        DbService::connect_in_memory().await.unwrap().pool
    }

    fn payload(name: &str) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
            slug: None,
            description: None,
            icon_url: None,
        }
    }

    #[tokio::test]
    async fn create_derives_slug_from_name() {
        let pool = test_pool().await;
        let cat = create(&pool, payload("Cocina Española")).await.unwrap();
        assert_eq!(cat.slug, "cocina-espanola");
        assert_eq!(cat.restaurant_count, 0);
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let pool = test_pool().await;
        create(&pool, payload("Italiana")).await.unwrap();
        let err = create(&pool, payload("Italiana")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn duplicate_explicit_slug_is_conflict() {
        let pool = test_pool().await;
        create(&pool, payload("Japonesa")).await.unwrap();
        let mut data = payload("Japo");
        data.slug = Some("japonesa".to_string());
        let err = create(&pool, data).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_slug_check_excludes_self() {
        let pool = test_pool().await;
        let cat = create(&pool, payload("Mariscos")).await.unwrap();
        // Re-submitting its own slug must not conflict
        let updated = update(
            &pool,
            cat.id,
            CategoryUpdate {
                slug: Some("mariscos".to_string()),
                description: Some("Pescados y mariscos".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Pescados y mariscos"));
    }

    #[tokio::test]
    async fn find_by_slug_and_delete() {
        let pool = test_pool().await;
        let cat = create(&pool, payload("Cafeteria")).await.unwrap();
        let found = find_by_slug(&pool, "cafeteria").await.unwrap().unwrap();
        assert_eq!(found.id, cat.id);

        assert!(delete(&pool, cat.id).await.unwrap());
        assert!(find_by_id(&pool, cat.id).await.unwrap().is_none());

        let err = delete(&pool, cat.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_with_search_and_pagination() {
        let pool = test_pool().await;
        for name in ["Mexicana", "Italiana", "Peruana", "Francesa"] {
            create(&pool, payload(name)).await.unwrap();
        }

        let page = PageQuery {
            limit: Some(2),
            ..Default::default()
        };
        let result = find_all(&pool, None, &page).await.unwrap();
        assert_eq!(result.data.len(), 2);
        assert_eq!(result.pagination.total, 4);
        assert_eq!(result.pagination.total_pages, 2);
        assert!(result.pagination.has_next);
        // Default sort is name ascending
        assert_eq!(result.data[0].name, "Francesa");

        let result = find_all(&pool, Some("ana"), &PageQuery::default())
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 3);
    }
}
