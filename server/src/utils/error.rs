//! 统一错误处理
//!
//! Application-level error type and the JSON envelopes used by every
//! handler:
//!
//! - [`AppError`] — typed error enum, converted to the uniform error
//!   envelope `{"error": {"code", "message", "timestamp"}}`
//! - [`ApiData`] — success envelope `{"data": ...}`
//!
//! # Status mapping
//!
//! | Variant | Status | code |
//! |---------|--------|------|
//! | NotFound | 404 | RESOURCE_NOT_FOUND |
//! | Conflict | 409 | DUPLICATE_RESOURCE |
//! | Validation | 422 | VALIDATION_ERROR |
//! | Invalid | 400 | BAD_REQUEST |
//! | Database | 500 | DATABASE_ERROR |
//! | Internal | 500 | INTERNAL_ERROR |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (422)
    Validation(String),

    #[error("Invalid request: {0}")]
    /// 无效请求 (400)
    Invalid(String),

    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

/// 处理器的 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Error envelope: `{"error": {"code", "message", "timestamp"}}`
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "DUPLICATE_RESOURCE", msg),
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg)
            }
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Database(msg) => {
                // 记录内部错误但不暴露详细信息
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorEnvelope {
            error: ErrorBody {
                code,
                message,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// ========== Response helpers ==========

/// Success envelope: `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiData<T> {
    pub data: T,
}

/// Wrap a value in the `{"data": ...}` envelope
pub fn data<T: Serialize>(value: T) -> Json<ApiData<T>> {
    Json(ApiData { data: value })
}

/// Plain message response (delete confirmations)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Build a `{"message": ...}` response
pub fn message(msg: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: msg.into(),
    })
}
