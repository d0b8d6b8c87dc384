//! 監視スケジューラー
//!
//! 固定周期のサイクルで全エンドポイントをチェックし、ドメイン別の稼働率を
//! 記録・出力する。処理がサイクル周期を超えた場合は待機せずに次のサイクルへ進む
//! （超過分の補正は行わない）。

use crate::health::HealthProbe;
use crate::shutdown::ShutdownController;
use crate::stats::AvailabilityStats;
use endpoint_monitor_common::config::{MonitorConfig, DEFAULT_CONCURRENCY, DEFAULT_CYCLE_PERIOD_SECS};
use endpoint_monitor_common::types::EndpointDescriptor;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// スケジューラー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// 目標サイクル周期
    pub cycle_period: Duration,
    /// 1サイクル内の同時チェック数（1 = 逐次）
    pub concurrency: usize,
    /// 実行サイクル数の上限（`None`はシャットダウンまで無制限）
    pub max_cycles: Option<u64>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            cycle_period: Duration::from_secs(DEFAULT_CYCLE_PERIOD_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            max_cycles: None,
        }
    }
}

impl From<&MonitorConfig> for SchedulerSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            cycle_period: config.cycle_period(),
            concurrency: config.effective_concurrency(),
            max_cycles: None,
        }
    }
}

/// 1サイクルの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 全エンドポイントのチェックが完了した
    Completed,
    /// シャットダウン要求により中断した（記録済みの結果は保持される）
    Interrupted,
}

/// 次のサイクルまでの待機時間（`max(0, period - elapsed)`）
pub fn pacing_delay(elapsed: Duration, period: Duration) -> Duration {
    period.saturating_sub(elapsed)
}

/// 稼働率を1ドメイン1行で出力
pub fn log_availability(stats: &AvailabilityStats) {
    for (domain, domain_stats) in stats.iter() {
        if let Some(availability) = domain_stats.availability() {
            info!("{} has {}% availability", domain, availability);
        }
    }
}

/// 監視ループ
pub struct Monitor<P> {
    probe: P,
    endpoints: Arc<[EndpointDescriptor]>,
    stats: AvailabilityStats,
    settings: SchedulerSettings,
    shutdown: ShutdownController,
    completed_cycles: u64,
}

impl<P: HealthProbe> Monitor<P> {
    /// 新しい監視ループを作成
    pub fn new(
        probe: P,
        endpoints: impl Into<Arc<[EndpointDescriptor]>>,
        settings: SchedulerSettings,
        shutdown: ShutdownController,
    ) -> Self {
        Self {
            probe,
            endpoints: endpoints.into(),
            stats: AvailabilityStats::new(),
            settings,
            shutdown,
            completed_cycles: 0,
        }
    }

    /// 現在の集計値
    pub fn stats(&self) -> &AvailabilityStats {
        &self.stats
    }

    /// 完了したサイクル数
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    fn cycle_limit_reached(&self) -> bool {
        matches!(self.settings.max_cycles, Some(max) if self.completed_cycles >= max)
    }

    /// シャットダウン要求（または上限サイクル数）まで監視を続け、集計結果を返す
    pub async fn run(mut self) -> AvailabilityStats {
        info!(
            endpoints = self.endpoints.len(),
            cycle_period_secs = self.settings.cycle_period.as_secs_f64(),
            concurrency = self.settings.concurrency,
            "Starting monitoring"
        );

        loop {
            if self.shutdown.is_shutdown_requested() || self.cycle_limit_reached() {
                break;
            }

            let cycle_start = Instant::now();
            debug!("Starting check cycle");

            if self.run_cycle().await == CycleOutcome::Interrupted {
                info!("Check cycle interrupted by shutdown");
                break;
            }
            debug!("Check cycle completed");

            if self.cycle_limit_reached() {
                break;
            }

            let elapsed = cycle_start.elapsed();
            let delay = pacing_delay(elapsed, self.settings.cycle_period);
            debug!(
                "Cycle took {:.2}s, sleeping for {:.2}s",
                elapsed.as_secs_f64(),
                delay.as_secs_f64()
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown.wait() => {
                    break;
                }
            }
        }

        info!(
            cycles = self.completed_cycles,
            domains = self.stats.len(),
            "Monitoring stopped"
        );
        self.stats
    }

    /// 1サイクル分のチェックを実行し、完了後にドメイン別の稼働率を出力する
    ///
    /// 結果は設定ファイルの順序どおりに記録される。同時実行数が2以上の場合も
    /// 記録はこのタスクだけが行う。
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let probe = &self.probe;
        let shutdown = &self.shutdown;
        let stats = &mut self.stats;

        // Futureを先に組み立てておくと、run()のFutureがSendのまま保たれる
        let pending: Vec<_> = self
            .endpoints
            .iter()
            .map(|endpoint| async move { (endpoint, probe.check(endpoint).await) })
            .collect();
        let checks = stream::iter(pending).buffered(self.settings.concurrency.max(1));
        tokio::pin!(checks);

        loop {
            if shutdown.is_shutdown_requested() {
                return CycleOutcome::Interrupted;
            }

            let next = tokio::select! {
                biased;
                _ = shutdown.wait() => return CycleOutcome::Interrupted,
                next = checks.next() => next,
            };

            let Some((endpoint, verdict)) = next else {
                break;
            };
            stats.record(endpoint.domain(), verdict);
        }

        self.completed_cycles += 1;
        debug!("Status check results:");
        log_availability(&self.stats);

        CycleOutcome::Completed
    }
}
