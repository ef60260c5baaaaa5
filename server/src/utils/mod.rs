//! Utility modules: error handling, logging, input validation.

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiData, AppError, AppResult, MessageResponse, data, message};
