//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 接続テストエンドポイントは `{error, message}` 形式のボディを返す契約のため、
//! `external_label()` が `error` フィールド、`message()` が `message` フィールドに対応する。

use axum::http::StatusCode;
use thiserror::Error;

/// Backend error type
#[derive(Debug, Error)]
pub enum BackendError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate resource)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the fixed label used as the `error` field of error responses.
    pub fn external_label(&self) -> &'static str {
        match self {
            Self::Database(_) => "PostgreSQL connection failed",
            Self::Cache(_) => "Redis connection failed",
            Self::Validation(_) => "Validation failed",
            Self::Conflict(_) => "Resource conflict",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the detail string used as the `message` field of error responses.
    pub fn message(&self) -> &str {
        match self {
            Self::Database(m)
            | Self::Cache(m)
            | Self::Validation(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }
}

/// Result type alias
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BackendError::Database("connection refused".to_string());
        assert_eq!(error.to_string(), "Database error: connection refused");
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            BackendError::Database("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BackendError::Cache("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BackendError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BackendError::Conflict("x".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            BackendError::Internal("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_external_label() {
        assert_eq!(
            BackendError::Database("x".to_string()).external_label(),
            "PostgreSQL connection failed"
        );
        assert_eq!(
            BackendError::Cache("x".to_string()).external_label(),
            "Redis connection failed"
        );
        assert_eq!(
            BackendError::Conflict("x".to_string()).external_label(),
            "Resource conflict"
        );
    }

    #[test]
    fn test_message_returns_detail_only() {
        let error = BackendError::Cache("PING failed: timeout".to_string());
        assert_eq!(error.message(), "PING failed: timeout");
    }
}
