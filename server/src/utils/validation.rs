//! Input validation helpers
//!
//! Centralized text length constants and validation functions called by the
//! CRUD handlers before any repository work. SQLite TEXT has no built-in
//! length enforcement, so limits live here.

use chrono::NaiveDate;

use crate::utils::AppError;
use shared::pagination::{MAX_LIMIT, PageQuery};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, category, menu, product, table number, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, special requests, review comments
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, postal codes, time strings
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Street addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate pagination parameters: page >= 1, 1 <= limit <= 100.
pub fn validate_page_query(query: &PageQuery) -> Result<(), AppError> {
    if query.page() < 1 {
        return Err(AppError::validation("page must be at least 1"));
    }
    let limit = query.limit();
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(())
}

/// Validate a `HH:MM` time-of-day string (hour 0-23, minute 0-59).
pub fn validate_time_hhmm(value: &str, field: &str) -> Result<(), AppError> {
    let valid = match value.split_once(':') {
        Some((hour, minute)) => {
            (1..=2).contains(&hour.len())
                && minute.len() == 2
                && hour.bytes().all(|b| b.is_ascii_digit())
                && minute.bytes().all(|b| b.is_ascii_digit())
                && hour.parse::<u32>().is_ok_and(|h| h <= 23)
                && minute.parse::<u32>().is_ok_and(|m| m <= 59)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!(
            "{field} must be a valid HH:MM time, got '{value}'"
        )));
    }
    Ok(())
}

/// Validate and parse a `YYYY-MM-DD` calendar date.
pub fn validate_date_ymd(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    shared::util::parse_date(value).ok_or_else(|| {
        AppError::validation(format!(
            "{field} must be a valid YYYY-MM-DD date, got '{value}'"
        ))
    })
}

/// Validate a party size (positive).
pub fn validate_party_size(value: i64) -> Result<(), AppError> {
    if value < 1 {
        return Err(AppError::validation("partySize must be at least 1"));
    }
    Ok(())
}

/// Validate a review rating (1-5).
pub fn validate_rating(value: i64) -> Result<(), AppError> {
    if !(1..=5).contains(&value) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

/// Validate a day-of-week index (0 = Sunday .. 6 = Saturday).
pub fn validate_day_of_week(value: i64) -> Result<(), AppError> {
    if !(0..=6).contains(&value) {
        return Err(AppError::validation("dayOfWeek must be between 0 and 6"));
    }
    Ok(())
}

/// Validate a table capacity (positive).
pub fn validate_capacity(value: i64) -> Result<(), AppError> {
    if value < 1 {
        return Err(AppError::validation("capacity must be at least 1"));
    }
    Ok(())
}

/// Validate a monetary amount: finite and non-negative.
pub fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate a line-item quantity (positive).
pub fn validate_quantity(value: i64) -> Result<(), AppError> {
    if value < 1 {
        return Err(AppError::validation("quantity must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_format_accepts_valid() {
        for t in ["0:00", "09:30", "19:00", "23:59", "7:05"] {
            assert!(validate_time_hhmm(t, "time").is_ok(), "{t} should pass");
        }
    }

    #[test]
    fn time_format_rejects_invalid() {
        for t in ["24:00", "19:60", "19", "19:0", "1900", "ab:cd", "019:00", ""] {
            assert!(validate_time_hhmm(t, "time").is_err(), "{t} should fail");
        }
    }

    #[test]
    fn date_parsing() {
        assert!(validate_date_ymd("2024-12-25", "date").is_ok());
        assert!(validate_date_ymd("2024-02-30", "date").is_err());
        assert!(validate_date_ymd("25/12/2024", "date").is_err());
    }

    #[test]
    fn page_limits() {
        let ok = PageQuery {
            page: Some(1),
            limit: Some(100),
            ..Default::default()
        };
        assert!(validate_page_query(&ok).is_ok());

        let too_big = PageQuery {
            limit: Some(101),
            ..Default::default()
        };
        assert!(validate_page_query(&too_big).is_err());

        let zero_page = PageQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(validate_page_query(&zero_page).is_err());
    }

    #[test]
    fn price_bounds() {
        assert!(validate_price(0.0, "price").is_ok());
        assert!(validate_price(99.99, "price").is_ok());
        assert!(validate_price(-1.0, "price").is_err());
        assert!(validate_price(f64::NAN, "price").is_err());
        assert!(validate_price(f64::INFINITY, "price").is_err());
    }
}
