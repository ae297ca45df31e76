//! Rust Backend Server Entry Point

use rust_backend::health::{ConnectivityMonitor, ConnectivitySupervisor, RetryPolicy};
use rust_backend::{cache, config, db, logging, server, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    logging::init().expect("failed to initialize logging");

    info!("Rust Backend v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config::ServerConfig::from_env();
    let database_config = config::DatabaseConfig::from_env();
    let cache_config = config::CacheConfig::from_env();

    // 接続プール・クライアントは遅延接続で作成する（ここではI/Oしない）
    let db_pool = db::create_pool(&database_config).expect("Invalid database configuration");
    let cache_client = cache::create_client(&cache_config.url).expect("Invalid Redis URL");

    info!(url = %cache_config.url, "Redis configured");

    // 接続モニターを起動（完了を待たない。依存先が落ちていても起動は継続する）
    let policy = RetryPolicy::default();
    let datastore_monitor = ConnectivityMonitor::new(
        Arc::new(db::DatastoreProbe::new(db_pool.clone())),
        policy,
    );
    let cache_monitor = ConnectivityMonitor::new(
        Arc::new(cache::CacheProbe::new(cache_client.clone())),
        policy,
    );
    let datastore_state = datastore_monitor.state();
    let cache_state = cache_monitor.state();
    let supervisor = ConnectivitySupervisor::start(vec![datastore_monitor, cache_monitor]);

    let state = AppState {
        db_pool,
        cache: cache_client,
    };

    server::run(state, &server_config.bind_addr()).await;

    info!(
        postgresql = datastore_state.get().as_str(),
        redis = cache_state.get().as_str(),
        "Last established connectivity at shutdown"
    );
    supervisor.shutdown();
}
