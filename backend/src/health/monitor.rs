//! 接続モニター
//!
//! 依存先ごとに1タスクで動作する接続確立ロジック。
//! 有限リトライ（指数バックオフ）→ 失敗時はバックグラウンド再試行（固定間隔）
//! の順で、最初のプローブ成功をもって終了する。

use crate::common::error::BackendError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// 有限リトライの最大試行回数
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// バックオフの基準待機時間（秒）
const DEFAULT_BASE_DELAY_SECS: u64 = 2;

/// バックオフの倍率（試行ごとに2倍）
const DEFAULT_MULTIPLIER: u32 = 2;

/// バックグラウンド再試行の間隔（秒）
const DEFAULT_BACKGROUND_INTERVAL_SECS: u64 = 10;

/// 依存先の接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// 未確認（初期状態）
    Unknown,
    /// 接続確認済み
    Connected,
    /// 切断を確認
    Disconnected,
}

impl ConnectivityState {
    /// ログ・表示用の文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Connected => 1,
            Self::Disconnected => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connected,
            2 => Self::Disconnected,
            _ => Self::Unknown,
        }
    }
}

/// タスク間で共有する接続状態ハンドル
///
/// 書き込みは依存先を担当するモニタータスクのみが行い、
/// 読み取りは任意のタスクからアトミックに可能。
#[derive(Clone, Debug)]
pub struct SharedConnectivityState {
    inner: Arc<AtomicU8>,
}

impl SharedConnectivityState {
    /// `Unknown` 状態のハンドルを作成
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(ConnectivityState::Unknown.as_u8())),
        }
    }

    /// 現在の状態を読み取る
    pub fn get(&self) -> ConnectivityState {
        ConnectivityState::from_u8(self.inner.load(Ordering::Acquire))
    }

    fn set(&self, state: ConnectivityState) {
        self.inner.store(state.as_u8(), Ordering::Release);
    }
}

impl Default for SharedConnectivityState {
    fn default() -> Self {
        Self::new()
    }
}

/// リトライポリシー
///
/// 有限リトライとバックグラウンド再試行の両方のパラメータを持つ。
/// 両依存先で同じ既定値を共有するが、モニターごとに個別指定もできる。
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 有限リトライの最大試行回数
    pub max_attempts: u32,
    /// 初回失敗後の待機時間
    pub base_delay: Duration,
    /// 待機時間の倍率（試行ごと）
    pub multiplier: u32,
    /// バックグラウンド再試行の固定間隔
    pub background_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(DEFAULT_BASE_DELAY_SECS),
            multiplier: DEFAULT_MULTIPLIER,
            background_interval: Duration::from_secs(DEFAULT_BACKGROUND_INTERVAL_SECS),
        }
    }
}

impl RetryPolicy {
    /// n回目の失敗後に待機する時間を計算する（attemptは1始まり）
    ///
    /// `base_delay * multiplier^(attempt-1)`。既定値では 2s, 4s, 8s, 16s となる。
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * self.multiplier.pow(attempt.saturating_sub(1))
    }

    /// 最大試行回数を設定
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// 基準待機時間を設定
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// バックグラウンド再試行の間隔を設定
    pub fn with_background_interval(mut self, interval: Duration) -> Self {
        self.background_interval = interval;
        self
    }
}

/// 依存先への到達性を1回検証するプローブ
///
/// 呼び出し間で状態を持たない。エラーは値として返し、パニックさせない。
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// ログ出力に使う依存先名
    fn target(&self) -> &'static str;

    /// 接続検証を1回実行する
    async fn check(&self) -> Result<(), BackendError>;
}

/// 有限リトライの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// いずれかの試行でプローブが成功した
    Success,
    /// 全試行が失敗した
    ExhaustedAttempts,
}

/// 依存先1つ分の接続モニター
///
/// 接続状態は成功時にのみ `Connected` へ更新する。プローブ失敗だけでは
/// `Disconnected` にはしない（現在の到達性はヘルスチェック側が
/// 都度プローブで判定する）。
pub struct ConnectivityMonitor {
    probe: Arc<dyn Probe>,
    policy: RetryPolicy,
    state: SharedConnectivityState,
}

impl ConnectivityMonitor {
    /// 新しいモニターを作成
    pub fn new(probe: Arc<dyn Probe>, policy: RetryPolicy) -> Self {
        Self {
            probe,
            policy,
            state: SharedConnectivityState::new(),
        }
    }

    /// 接続状態の共有ハンドルを取得
    pub fn state(&self) -> SharedConnectivityState {
        self.state.clone()
    }

    /// モニター1回分のライフサイクルを実行する
    ///
    /// 有限リトライで接続できなければバックグラウンド再試行へ移行し、
    /// 最初の成功で終了する。
    pub(crate) async fn run(self) {
        if self.run_bounded_retry().await == RetryOutcome::ExhaustedAttempts {
            self.run_background_retry().await;
        }
    }

    /// 有限リトライを実行する
    ///
    /// 最大 `max_attempts` 回プローブし、失敗のたびに待機時間を2倍に伸ばす。
    /// 成功した時点で即座に打ち切る。プローブのエラーはすべてここで吸収する。
    pub(crate) async fn run_bounded_retry(&self) -> RetryOutcome {
        let dependency = self.probe.target();
        let max_attempts = self.policy.max_attempts;

        info!(dependency, max_attempts, "Establishing connection");

        for attempt in 1..=max_attempts {
            match self.probe.check().await {
                Ok(()) => {
                    self.state.set(ConnectivityState::Connected);
                    info!(dependency, attempt, "Connection established");
                    return RetryOutcome::Success;
                }
                Err(e) => {
                    warn!(
                        dependency,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Connection attempt failed"
                    );
                    if attempt < max_attempts {
                        let delay = self.policy.backoff_delay(attempt);
                        info!(
                            dependency,
                            delay_secs = delay.as_secs(),
                            "Waiting before retry"
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        warn!(
            dependency,
            "All connection attempts failed; continuing to retry in background"
        );
        RetryOutcome::ExhaustedAttempts
    }

    /// バックグラウンド再試行を実行する
    ///
    /// 固定間隔でプローブし続け、最初の成功で終了する。
    /// 上限はない（依存先が復旧するまで低優先度で回り続ける）。
    pub(crate) async fn run_background_retry(&self) {
        let dependency = self.probe.target();

        loop {
            sleep(self.policy.background_interval).await;

            match self.probe.check().await {
                Ok(()) => {
                    self.state.set(ConnectivityState::Connected);
                    info!(dependency, "Connection established (background retry)");
                    return;
                }
                Err(e) => {
                    warn!(dependency, error = %e, "Background retry failed");
                }
            }
        }
    }
}
