//! キャッシュアクセス層
//!
//! Redisへの接続検証とテスト操作

use crate::common::error::{BackendError, BackendResult};
use crate::health::Probe;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

/// 接続確立のタイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 接続テストで使用するキー
const TEST_KEY: &str = "rust-test-key";

/// 接続テストで書き込む値
const TEST_VALUE: &str = "Hello from Rust backend!";

/// テスト値の有効期限（秒）
const TEST_VALUE_TTL_SECS: u64 = 300;

/// Redisクライアントを作成する
///
/// この時点ではI/Oを行わない。接続は各操作時に確立されるため、
/// Redisが落ちていてもプロセス起動はブロックされない。
pub fn create_client(url: &str) -> BackendResult<redis::Client> {
    redis::Client::open(url).map_err(|e| BackendError::Cache(format!("Invalid Redis URL: {}", e)))
}

/// 接続を確立する（タイムアウト付き）
async fn connect(client: &redis::Client) -> BackendResult<MultiplexedConnection> {
    tokio::time::timeout(
        Duration::from_secs(CONNECT_TIMEOUT_SECS),
        client.get_multiplexed_async_connection(),
    )
    .await
    .map_err(|_| BackendError::Cache("Connection timed out".to_string()))?
    .map_err(|e| BackendError::Cache(format!("Connection failed: {}", e)))
}

/// Redisへの到達性をPINGで検証する
///
/// 呼び出しごとに接続を確立してコマンドを発行する。結果のキャッシュはしない。
pub async fn probe(client: &redis::Client) -> BackendResult<()> {
    let mut conn = connect(client).await?;

    let _pong: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e| BackendError::Cache(format!("PING failed: {}", e)))?;

    Ok(())
}

/// SET/GETの往復で接続を検証し、読み戻した値を返す
pub async fn roundtrip(client: &redis::Client) -> BackendResult<String> {
    let mut conn = connect(client).await?;

    let _: () = conn
        .set_ex(TEST_KEY, TEST_VALUE, TEST_VALUE_TTL_SECS)
        .await
        .map_err(|e| BackendError::Cache(format!("SET failed: {}", e)))?;

    let value: String = conn
        .get(TEST_KEY)
        .await
        .map_err(|e| BackendError::Cache(format!("GET failed: {}", e)))?;

    Ok(value)
}

/// 起動時接続確立用のRedisプローブ
pub struct CacheProbe {
    client: redis::Client,
}

impl CacheProbe {
    /// クライアントを保持するプローブを作成
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for CacheProbe {
    fn target(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> Result<(), BackendError> {
        probe(&self.client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_invalid_url() {
        let result = create_client("not-a-valid-url");
        assert!(matches!(result, Err(BackendError::Cache(_))));
    }

    #[test]
    fn test_create_client_does_no_io() {
        // 到達不能なホストでもクライアント作成自体は成功する
        assert!(create_client("redis://127.0.0.1:1").is_ok());
    }
}
