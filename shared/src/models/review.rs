//! Review Model

use serde::{Deserialize, Serialize};

/// Restaurant review entity (one per user per restaurant)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub visit_date: Option<i64>,
    pub is_visible: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create review payload (`visitDate` as `YYYY-MM-DD`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub user_id: i64,
    pub rating: i64,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub visit_date: Option<String>,
}

/// Update review payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub rating: Option<i64>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub visit_date: Option<String>,
    pub is_visible: Option<bool>,
}
