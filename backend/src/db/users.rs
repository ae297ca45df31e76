//! ユーザーCRUD操作

use crate::common::error::{BackendError, BackendResult};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// 一覧取得の最大件数
const LIST_LIMIT: i64 = 10;

/// ユーザー
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// ユーザーID
    pub id: i64,
    /// 名前
    pub name: String,
    /// メールアドレス（一意）
    pub email: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

/// ユーザー一覧を取得
///
/// # Arguments
/// * `pool` - データベース接続プール
///
/// # Returns
/// * `Ok(Vec<User>)` - 作成日時の降順、最大10件
/// * `Err(BackendError)` - 取得失敗
pub async fn list(pool: &PgPool) -> BackendResult<Vec<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at FROM users ORDER BY created_at DESC LIMIT $1",
    )
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await
    .map_err(|e| BackendError::Database(format!("Failed to list users: {}", e)))
}

/// ユーザーを作成
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `name` - 名前
/// * `email` - メールアドレス
///
/// # Returns
/// * `Ok(User)` - 作成されたユーザー
/// * `Err(BackendError)` - 作成失敗（メールアドレス重複は `Conflict`）
pub async fn create(pool: &PgPool, name: &str, email: &str) -> BackendResult<User> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email, created_at",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("duplicate key") {
            BackendError::Conflict(format!("Email '{}' already exists", email))
        } else {
            BackendError::Database(format!("Failed to create user: {}", e))
        }
    })
}

/// 登録ユーザー数を取得
///
/// # Arguments
/// * `pool` - データベース接続プール
///
/// # Returns
/// * `Ok(i64)` - ユーザー数
/// * `Err(BackendError)` - 取得失敗
pub async fn count(pool: &PgPool) -> BackendResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(|e| BackendError::Database(format!("Failed to count users: {}", e)))
}
