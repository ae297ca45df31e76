//! REST APIハンドラー
//!
//! ヘルスチェック、ユーザーCRUD、接続テストAPI

/// Axum用エラーレスポンス型
pub mod error;

/// 接続テストAPI
pub mod diagnostics;

/// ヘルスチェックAPI
pub mod system;

/// ユーザー管理API
pub mod users;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/postgres/test", get(diagnostics::postgres_test))
        .route("/api/redis/test", get(diagnostics::redis_test))
        .with_state(state)
}

/// ミドルウェア込みのアプリケーションを構築
///
/// CORSは全オリジン許可（開発用構成）。
pub fn create_app(state: AppState) -> Router {
    create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
