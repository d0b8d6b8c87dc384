//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist
    #[error("Configuration file not found at '{}'", .0.display())]
    NotFound(PathBuf),

    /// Configuration file could not be read
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Io {
        /// 読み込み対象のパス
        path: PathBuf,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// YAML syntax error
    #[error("Error parsing YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Top-level document is not a sequence
    #[error("YAML content should be a list of endpoints. Found: {found}")]
    NotAList {
        /// 実際に見つかったYAMLの型名
        found: &'static str,
    },

    /// Entry is not a mapping (1-based index)
    #[error("Endpoint entry #{0} is not a dictionary")]
    EntryNotMapping(usize),

    /// Entry has no usable `name` (1-based index)
    #[error("Endpoint entry #{0} missing required 'name' string field")]
    MissingName(usize),

    /// Entry has no usable `url` (1-based index)
    #[error("Endpoint entry #{0} missing required 'url' string field")]
    MissingUrl(usize),

    /// Optional fields have the wrong shape (1-based index)
    #[error("Endpoint entry #{index} is invalid: {source}")]
    InvalidEntry {
        /// エントリ番号（1始まり）
        index: usize,
        /// デシリアライズエラー
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
