//! Pagination query parameters and response envelope.
//!
//! Every paginated listing accepts `page`/`limit`/`sortBy`/`order` query
//! parameters and answers with `{ data: [...], pagination: {...} }`.

use serde::{Deserialize, Serialize};

/// Default page size for listings.
pub const DEFAULT_LIMIT: i64 = 20;
/// Upper bound for `limit`; larger values are a validation error.
pub const MAX_LIMIT: i64 = 100;

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Common pagination/sorting query parameters.
///
/// `sort_by` is resource-specific and whitelisted by each repository;
/// `order` defaults per resource when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
}

impl PageQuery {
    /// Effective page number (defaults to 1).
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// Effective page size (defaults to [`DEFAULT_LIMIT`]).
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// SQL OFFSET for the effective page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Paginated response envelope: `{ data, pagination }`.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}
