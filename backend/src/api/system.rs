//! ヘルスチェックAPI
//!
//! 依存先の状態はモニタータスクの結果を読まず、リクエストごとに
//! 都度プローブして判定する。どちらが落ちていてもHTTP 200で応答し、
//! 状態はボディに埋め込む。

use crate::{cache, db, AppState};
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

/// サービス識別名
const SERVICE_NAME: &str = "Rust Axum Backend";

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// サービス識別名
    pub service: String,
    /// サービスバージョン
    pub version: String,
    /// 応答時刻（ISO 8601）
    pub timestamp: String,
    /// 依存先の接続状況
    pub database: DatabaseStatus,
}

/// 依存先の接続状況
#[derive(Debug, Serialize)]
pub struct DatabaseStatus {
    /// PostgreSQLの接続状態
    pub postgresql: &'static str,
    /// PostgreSQLサーバーバージョン（接続失敗時はエラー詳細）
    pub version: Option<String>,
    /// Redisの接続状態
    pub redis: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (postgresql, version) = match db::probe(&state.db_pool).await {
        Ok(version) => ("Connected", Some(version)),
        Err(e) => {
            warn!(error = %e, "PostgreSQL health check failed");
            ("Disconnected", Some(e.message().to_string()))
        }
    };

    let redis = match cache::probe(&state.cache).await {
        Ok(()) => "Connected",
        Err(e) => {
            warn!(error = %e, "Redis health check failed");
            "Disconnected"
        }
    };

    Json(HealthResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        database: DatabaseStatus {
            postgresql,
            version,
            redis,
        },
    })
}
