//! 接続テストAPI
//!
//! PostgreSQL/Redisへの疎通をリクエストごとに検証する診断エンドポイント。
//! ヘルスチェックと異なり、失敗時は500と `{error, message}` ボディを返す。

use super::error::AppError;
use crate::{cache, db, AppState};
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

/// PostgreSQL接続テストのレスポンス
#[derive(Debug, Serialize)]
pub struct PostgresTestResponse {
    /// 結果メッセージ
    pub message: String,
    /// 登録ユーザー数
    #[serde(rename = "userCount")]
    pub user_count: i64,
    /// PostgreSQLサーバーバージョン
    pub version: String,
    /// 実行時刻（ISO 8601）
    pub timestamp: String,
}

/// Redis接続テストのレスポンス
#[derive(Debug, Serialize)]
pub struct RedisTestResponse {
    /// 結果メッセージ
    pub message: String,
    /// 書き込み後に読み戻したテスト値
    #[serde(rename = "testValue")]
    pub test_value: String,
    /// 実行時刻（ISO 8601）
    pub timestamp: String,
}

/// GET /api/postgres/test
pub async fn postgres_test(
    State(state): State<AppState>,
) -> Result<Json<PostgresTestResponse>, AppError> {
    let version = db::probe(&state.db_pool).await.map_err(|e| {
        error!(error = %e, "PostgreSQL connection test failed");
        AppError(e)
    })?;

    let user_count = db::users::count(&state.db_pool).await.map_err(|e| {
        error!(error = %e, "Failed to count users");
        AppError(e)
    })?;

    Ok(Json(PostgresTestResponse {
        message: "PostgreSQL connection successful".to_string(),
        user_count,
        version,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// GET /api/redis/test
pub async fn redis_test(
    State(state): State<AppState>,
) -> Result<Json<RedisTestResponse>, AppError> {
    let test_value = cache::roundtrip(&state.cache).await.map_err(|e| {
        error!(error = %e, "Redis connection test failed");
        AppError(e)
    })?;

    Ok(Json(RedisTestResponse {
        message: "Redis connection successful".to_string(),
        test_value,
        timestamp: Utc::now().to_rfc3339(),
    }))
}
