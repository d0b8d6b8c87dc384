//! ロギング初期化
//!
//! コンソール（INFO）に加えて、ログディレクトリに以下の3ファイルを出力する。
//!
//! - `monitor.log`: INFO以上
//! - `error.log`: ERRORのみ（ソースファイルと行番号付き）
//! - `debug.log`: DEBUG以上

use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 通常ログのファイル名
pub const MONITOR_LOG_FILE: &str = "monitor.log";

/// エラーログのファイル名
pub const ERROR_LOG_FILE: &str = "error.log";

/// デバッグログのファイル名
pub const DEBUG_LOG_FILE: &str = "debug.log";

/// HTTPクライアント内部のクレート（ファイルログではINFOまでに抑える）
const NOISY_TARGETS: &[&str] = &["hyper", "reqwest", "h2", "rustls"];

/// ロギング設定
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// ログ出力ディレクトリ（存在しなければ作成）
    pub log_dir: PathBuf,
    /// コンソール出力のレベル（`RUST_LOG`が設定されていればそちらを優先）
    pub console_level: LevelFilter,
}

/// ファイル書き込みスレッドのガード
///
/// ドロップするとバッファがフラッシュされるため、プロセス終了まで保持すること。
#[must_use = "dropping the guards stops file logging"]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// グローバルなtracing subscriberを初期化
pub fn init(options: &LoggingOptions) -> anyhow::Result<LogGuards> {
    std::fs::create_dir_all(&options.log_dir)?;

    let (monitor_layer, monitor_guard) =
        file_layer(&options.log_dir, MONITOR_LOG_FILE, LevelFilter::INFO, false)?;
    let (error_layer, error_guard) =
        file_layer(&options.log_dir, ERROR_LOG_FILE, LevelFilter::ERROR, true)?;
    let (debug_layer, debug_guard) =
        file_layer(&options.log_dir, DEBUG_LOG_FILE, LevelFilter::DEBUG, false)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.console_level.to_string()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stdout).with_filter(console_filter))
        .with(monitor_layer)
        .with(error_layer)
        .with(debug_layer)
        .try_init()?;

    Ok(LogGuards {
        _guards: vec![monitor_guard, error_guard, debug_guard],
    })
}

fn file_filter(level: LevelFilter) -> Targets {
    NOISY_TARGETS
        .iter()
        .fold(Targets::new().with_default(level), |targets, target| {
            targets.with_target(*target, level.min(LevelFilter::INFO))
        })
}

fn file_layer<S>(
    dir: &Path,
    file_name: &str,
    level: LevelFilter,
    with_location: bool,
) -> anyhow::Result<(Box<dyn Layer<S> + Send + Sync + 'static>, WorkerGuard)>
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_file(with_location)
        .with_line_number(with_location)
        .with_filter(file_filter(level))
        .boxed();

    Ok((layer, guard))
}
