//! ヘルスチェック
//!
//! 1エンドポイントに1回だけリクエストを送信し、ステータスコードと
//! レイテンシからUP/DOWNを判定する。

/// reqwestによるヘルスチェッカー実装
pub mod endpoint_checker;

pub use endpoint_checker::{classify, CheckError, CheckerSettings, EndpointHealthChecker};

use async_trait::async_trait;
use endpoint_monitor_common::types::{EndpointDescriptor, HealthVerdict};

/// ヘルスチェックの抽象
///
/// 監視ループはこのトレイト越しにチェックを実行する。実装は失敗を
/// 呼び出し元へ伝播させず、必ず判定結果を返さなければならない。
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// エンドポイントを1回チェックして判定を返す
    async fn check(&self, endpoint: &EndpointDescriptor) -> HealthVerdict;
}

