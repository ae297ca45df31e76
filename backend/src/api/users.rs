//! ユーザー管理API
//!
//! ユーザーの一覧取得と作成

use super::error::AppError;
use crate::common::error::BackendError;
use crate::db::users::{self, User};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

/// ユーザー作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// 名前
    pub name: String,
    /// メールアドレス
    pub email: String,
}

/// ユーザーレスポンス
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// ユーザーID
    pub id: i64,
    /// 名前
    pub name: String,
    /// メールアドレス
    pub email: String,
    /// 作成日時（ISO 8601）
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// リクエスト内容を検証する
///
/// データベースアクセスの前に呼び出し、不正な入力は400で弾く。
fn validate(request: &CreateUserRequest) -> Result<(), BackendError> {
    if request.name.trim().is_empty() {
        return Err(BackendError::Validation(
            "name must not be empty".to_string(),
        ));
    }

    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(BackendError::Validation(format!(
            "'{}' is not a valid email address",
            request.email
        )));
    }

    Ok(())
}

/// GET /api/users - ユーザー一覧取得
///
/// 作成日時の降順で最大10件を返す。
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = users::list(&state.db_pool).await.map_err(|e| {
        error!(error = %e, "Failed to list users");
        AppError(e)
    })?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users - ユーザー作成
///
/// # Returns
/// * `201 Created` - 作成されたユーザー
/// * `400 Bad Request` - 入力不正
/// * `409 Conflict` - メールアドレス重複
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validate(&request)?;

    let user = users::create(&state.db_pool, request.name.trim(), request.email.trim())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create user");
            AppError(e)
        })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let request = CreateUserRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let request = CreateUserRequest {
            name: "   ".to_string(),
            email: "alice@example.com".to_string(),
        };
        assert!(matches!(
            validate(&request),
            Err(BackendError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let request = CreateUserRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(matches!(
            validate(&request),
            Err(BackendError::Validation(_))
        ));
    }
}
