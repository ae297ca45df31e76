//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::BackendError;
use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型
///
/// `{error, message}` 形式のJSONボディを返す。`error` は定型ラベル、
/// `message` はエラー詳細。
#[derive(Debug)]
pub struct AppError(pub BackendError);

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        let payload = json!({
            "error": self.0.external_label(),
            "message": self.0.message(),
        });

        (status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_database_error_maps_to_500() {
        let response =
            AppError(BackendError::Database("connection refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_maps_to_400() {
        let response =
            AppError(BackendError::Validation("name must not be empty".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_error_maps_to_409() {
        let response =
            AppError(BackendError::Conflict("email exists".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
