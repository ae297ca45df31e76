//! 接続監視
//!
//! 起動時にPostgreSQLとRedisへの接続を確立するサブシステム。
//! 各依存先ごとに指数バックオフ付きの有限リトライを行い、
//! 使い切った場合は固定間隔のバックグラウンド再試行へ移行する。
//! いずれもサーバー起動とリクエスト処理をブロックしない。

pub mod monitor;
pub mod supervisor;

pub use monitor::{
    ConnectivityMonitor, ConnectivityState, Probe, RetryOutcome, RetryPolicy,
    SharedConnectivityState,
};
pub use supervisor::ConnectivitySupervisor;
