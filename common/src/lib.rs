//! Endpoint Monitor Common
//!
//! 監視対象エンドポイントの型定義と設定ファイル読み込み

#![warn(missing_docs)]

/// 設定管理（デフォルト値・エンドポイント定義ファイル読み込み）
pub mod config;

/// エラー型定義
pub mod error;

/// 共通型定義
pub mod types;
