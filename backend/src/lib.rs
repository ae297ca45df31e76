//! Rust Backend Server
//!
//! PostgreSQLとRedisを利用する最小構成のバックエンドサービス

#![warn(missing_docs)]

/// 共通型定義
pub mod common;

/// REST APIハンドラー
pub mod api;

/// キャッシュアクセス
pub mod cache;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// 接続監視（起動時リトライとバックグラウンド再試行）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// サーバー起動・シャットダウン
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::PgPool,
    /// Redisクライアント
    pub cache: redis::Client,
}
