//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity (桌台)
///
/// `table_number` is unique within a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_number: String,
    pub capacity: i64,
    pub location: Option<String>,
    pub is_available: bool,
    pub is_active: bool,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableCreate {
    pub table_number: String,
    pub capacity: i64,
    pub location: Option<String>,
    pub is_available: Option<bool>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableUpdate {
    pub table_number: Option<String>,
    pub capacity: Option<i64>,
    pub location: Option<String>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
}

/// Table with its availability verdict for a queried slot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAvailability {
    #[serde(flatten)]
    pub table: DiningTable,
    pub available_for_time: bool,
}

/// Result of an availability check for one restaurant/date/time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub date: String,
    pub time: String,
    pub party_size: Option<i64>,
    pub total_tables: i64,
    pub available_count: i64,
    pub tables: Vec<TableAvailability>,
}
