//! 設定管理
//!
//! MonitorConfig（監視ループの設定値）とエンドポイント定義ファイルの読み込み

use crate::error::{ConfigError, ConfigResult};
use crate::types::EndpointDescriptor;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// サイクル周期のデフォルト（秒）
pub const DEFAULT_CYCLE_PERIOD_SECS: u64 = 15;

/// リクエストタイムアウトのデフォルト（ミリ秒）
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;

/// UP判定の最大レイテンシのデフォルト（ミリ秒、この値未満でUP）
pub const DEFAULT_MAX_LATENCY_MS: u64 = 500;

/// 同時チェック数のデフォルト（1 = 逐次実行）
pub const DEFAULT_CONCURRENCY: usize = 1;

/// ログ出力ディレクトリのデフォルト
pub const DEFAULT_LOG_DIR: &str = "logs";

/// 監視設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// サイクル周期（秒）(デフォルト: 15)
    pub cycle_period_secs: u64,

    /// リクエストタイムアウト（ミリ秒）(デフォルト: 1000)
    pub request_timeout_ms: u64,

    /// UP判定の最大レイテンシ（ミリ秒）(デフォルト: 500)
    pub max_latency_ms: u64,

    /// 1サイクル内の同時チェック数 (デフォルト: 1)
    pub concurrency: usize,

    /// ログ出力ディレクトリ (デフォルト: "logs")
    pub log_dir: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cycle_period_secs: DEFAULT_CYCLE_PERIOD_SECS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_latency_ms: DEFAULT_MAX_LATENCY_MS,
            concurrency: DEFAULT_CONCURRENCY,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl MonitorConfig {
    /// サイクル周期
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs(self.cycle_period_secs)
    }

    /// リクエストタイムアウト
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// UP判定の最大レイテンシ
    pub fn max_latency(&self) -> Duration {
        Duration::from_millis(self.max_latency_ms)
    }

    /// 同時チェック数（0は1として扱う）
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// エンドポイント定義ファイル（YAML）を読み込む
///
/// ファイルはエンドポイントのリストである必要があり、各エントリは
/// 空でない`name`と`url`の文字列を持たなければならない。
pub fn load_endpoints(path: impl AsRef<Path>) -> ConfigResult<Vec<EndpointDescriptor>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_endpoints(&content)
}

/// YAML文字列からエンドポイント定義を読み込む
pub fn parse_endpoints(yaml: &str) -> ConfigResult<Vec<EndpointDescriptor>> {
    let document: Value = serde_yaml::from_str(yaml)?;

    let entries = match document {
        Value::Sequence(entries) => entries,
        other => {
            return Err(ConfigError::NotAList {
                found: yaml_type_name(&other),
            })
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| validate_entry(i + 1, entry))
        .collect()
}

fn validate_entry(index: usize, entry: Value) -> ConfigResult<EndpointDescriptor> {
    if !entry.is_mapping() {
        return Err(ConfigError::EntryNotMapping(index));
    }

    let has_name = entry
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());
    if !has_name {
        return Err(ConfigError::MissingName(index));
    }

    if entry.get("url").and_then(Value::as_str).is_none() {
        return Err(ConfigError::MissingUrl(index));
    }

    serde_yaml::from_value(entry).map_err(|source| ConfigError::InvalidEntry { index, source })
}

fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
