//! Endpoint Monitor
//!
//! 設定されたHTTPエンドポイントを一定周期でチェックし、
//! ドメイン別の稼働率を集計・出力する。

#![warn(missing_docs)]

/// CLIインターフェース
pub mod cli;

/// ヘルスチェック（UP/DOWN判定）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 監視スケジューラー
pub mod scheduler;

/// Shutdown controller
pub mod shutdown;

/// ドメイン別稼働率集計
pub mod stats;

use endpoint_monitor_common::config::MonitorConfig;
use endpoint_monitor_common::types::EndpointDescriptor;
use health::{CheckError, CheckerSettings, EndpointHealthChecker};
use scheduler::{Monitor, SchedulerSettings};
use shutdown::ShutdownController;
use stats::AvailabilityStats;

/// エンドポイント一覧の監視を開始
///
/// シャットダウンが要求される（または`max_cycles`に達する）まで戻らない。
/// 戻り値は終了時点の累積集計値。
pub async fn run(
    endpoints: Vec<EndpointDescriptor>,
    config: &MonitorConfig,
    max_cycles: Option<u64>,
    shutdown: ShutdownController,
) -> Result<AvailabilityStats, CheckError> {
    let checker = EndpointHealthChecker::new(CheckerSettings::from(config))?;
    let settings = SchedulerSettings {
        max_cycles,
        ..SchedulerSettings::from(config)
    };

    Ok(Monitor::new(checker, endpoints, settings, shutdown).run().await)
}
