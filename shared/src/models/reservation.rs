//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation lifecycle status.
///
/// `pending -> {confirmed, cancelled}`, `confirmed -> {cancelled,
/// completed}`; `cancelled` and `completed` are terminal. Writing the
/// current status again is an allowed no-op, so cancelling twice stays
/// idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }
}

/// Reservation entity
///
/// Guest contact fields are always present, even when a user account is
/// linked. `reservation_date` is UTC midnight of the calendar day in epoch
/// milliseconds; `reservation_time` is a free-text `HH:MM` slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: Option<i64>,
    pub table_id: Option<i64>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub party_size: i64,
    pub reservation_date: i64,
    pub reservation_time: String,
    pub status: ReservationStatus,
    pub special_requests: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create reservation payload (`reservationDate` as `YYYY-MM-DD`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub restaurant_id: i64,
    pub user_id: Option<i64>,
    pub table_id: Option<i64>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub party_size: i64,
    pub reservation_date: String,
    pub reservation_time: String,
    pub special_requests: Option<String>,
}

/// Update reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    pub table_id: Option<i64>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub party_size: Option<i64>,
    pub reservation_date: Option<String>,
    pub reservation_time: Option<String>,
    pub status: Option<ReservationStatus>,
    pub special_requests: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;

    #[test]
    fn transition_graph() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn same_status_is_noop() {
        for s in [Pending, Confirmed, Cancelled, Completed] {
            assert!(s.can_transition_to(s));
        }
    }
}
