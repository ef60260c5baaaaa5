//! Repository Module
//!
//! Module-level CRUD functions over the SQLite pool, one module per
//! resource. Handlers never write SQL; everything store-related lives
//! here, including existence checks, duplicate checks and transactions.

// Catalog
pub mod address;
pub mod category;
pub mod menu;
pub mod product;
pub mod restaurant;
pub mod schedule;

// Location
pub mod dining_table;

// Booking & orders
pub mod order;
pub mod reservation;

// Reviews
pub mod review;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // 唯一约束兜底：预检查之外的竞争写入也映射为冲突
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::Validation("referenced row does not exist".to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Verify that a restaurant exists, used by every restaurant-scoped module.
pub(crate) async fn ensure_restaurant_exists(
    pool: &sqlx::SqlitePool,
    restaurant_id: i64,
) -> RepoResult<()> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurant WHERE id = ?")
        .bind(restaurant_id)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
        return Err(RepoError::NotFound(format!(
            "Restaurant {restaurant_id} not found"
        )));
    }
    Ok(())
}
