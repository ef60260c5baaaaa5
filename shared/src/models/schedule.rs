//! Schedule Model

use serde::{Deserialize, Serialize};

/// Weekly opening-hours entry, one row per `(restaurant, day_of_week)`.
///
/// `day_of_week` runs 0 (Sunday) through 6 (Saturday). Open/close times
/// are `HH:MM` strings and NULL on closed days.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Schedule {
    pub id: i64,
    pub restaurant_id: i64,
    pub day_of_week: i64,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: bool,
}

/// Create schedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCreate {
    pub day_of_week: i64,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: Option<bool>,
}

/// Update schedule payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub day_of_week: Option<i64>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: Option<bool>,
}
