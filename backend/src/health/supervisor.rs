//! 接続モニターの起動管理
//!
//! プロセス起動時に全モニターを並行起動し、タスクハンドルを
//! プロセス終了まで保持する。

use super::monitor::ConnectivityMonitor;
use tokio::task::JoinHandle;
use tracing::info;

/// プロセス常駐の接続モニタータスク群
///
/// `start()` は各モニターを独立したタスクとして起動して即座に戻る。
/// 接続の成否に関わらずサーバー起動とリクエスト処理は継続する。
pub struct ConnectivitySupervisor {
    handles: Vec<JoinHandle<()>>,
}

impl ConnectivitySupervisor {
    /// 全モニターをバックグラウンドタスクとして起動する
    ///
    /// モニター同士は完全に独立で、完了順序の保証はない。
    /// 呼び出しはプロセス起動時に1回のみ。
    pub fn start(monitors: Vec<ConnectivityMonitor>) -> Self {
        let handles: Vec<JoinHandle<()>> = monitors
            .into_iter()
            .map(|monitor| tokio::spawn(monitor.run()))
            .collect();

        info!(count = handles.len(), "Connectivity monitors started");

        Self { handles }
    }

    /// 未完了のモニタータスクを停止する
    ///
    /// 接続確立済みのタスクは既に終了している。サーバー終了時に呼び出し、
    /// 再試行中のタスクを残さない。
    pub fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// 全モニタータスクの完了を待つ
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::BackendError;
    use crate::health::monitor::{ConnectivityState, Probe, RetryPolicy};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    struct FixedProbe {
        succeed: bool,
        calls: AtomicU32,
    }

    impl FixedProbe {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                succeed,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Probe for FixedProbe {
        fn target(&self) -> &'static str {
            "fixed"
        }

        async fn check(&self) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(())
            } else {
                Err(BackendError::Internal("probe failed".to_string()))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_returns_without_waiting() {
        let probe_a = FixedProbe::new(false);
        let probe_b = FixedProbe::new(false);
        let monitor_a = ConnectivityMonitor::new(probe_a.clone(), RetryPolicy::default());
        let monitor_b = ConnectivityMonitor::new(probe_b.clone(), RetryPolicy::default());
        let state_a = monitor_a.state();
        let state_b = monitor_b.state();

        let start = Instant::now();
        let supervisor = ConnectivitySupervisor::start(vec![monitor_a, monitor_b]);
        assert_eq!(start.elapsed(), Duration::ZERO);

        // 両モニターが独立に有限リトライを消化する
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(probe_a.calls.load(Ordering::SeqCst), 5);
        assert_eq!(probe_b.calls.load(Ordering::SeqCst), 5);

        // 失敗し続けてもUnknownのまま（Disconnectedへは遷移しない）
        assert_eq!(state_a.get(), ConnectivityState::Unknown);
        assert_eq!(state_b.get(), ConnectivityState::Unknown);

        supervisor.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_completes_when_all_monitors_settle() {
        let probe_a = FixedProbe::new(true);
        let probe_b = FixedProbe::new(true);
        let monitor_a = ConnectivityMonitor::new(probe_a.clone(), RetryPolicy::default());
        let monitor_b = ConnectivityMonitor::new(probe_b.clone(), RetryPolicy::default());
        let state_a = monitor_a.state();
        let state_b = monitor_b.state();

        let supervisor = ConnectivitySupervisor::start(vec![monitor_a, monitor_b]);
        supervisor.join().await;

        assert_eq!(probe_a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(probe_b.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state_a.get(), ConnectivityState::Connected);
        assert_eq!(state_b.get(), ConnectivityState::Connected);
    }
}
