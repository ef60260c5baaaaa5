//! Shared types for the Mesa restaurant platform
//!
//! This crate holds the data models and wire types exchanged between the
//! server and its clients:
//!
//! - **models**: entities and create/update payloads for every resource
//! - **pagination**: page query parameters and the paginated response envelope
//! - **util**: snowflake IDs, timestamps, slug generation
//!
//! Database support (`sqlx::FromRow` / `sqlx::Type` derives) is gated behind
//! the `db` feature so frontend consumers don't pull in sqlx.

pub mod models;
pub mod pagination;
pub mod util;

pub use pagination::{PageQuery, Paginated, Pagination, SortOrder};
