//! エンドポイントヘルスチェッカー
//!
//! reqwestで設定どおりのメソッド・ヘッダー・ボディを送信し、
//! ステータスコードが2xxかつレイテンシが閾値未満ならUPと判定する。

use super::HealthProbe;
use async_trait::async_trait;
use endpoint_monitor_common::config::{
    MonitorConfig, DEFAULT_MAX_LATENCY_MS, DEFAULT_REQUEST_TIMEOUT_MS,
};
use endpoint_monitor_common::types::{EndpointDescriptor, HealthVerdict, RequestBody};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, warn};

/// ヘルスチェック内部のエラー（ログ出力専用、呼び出し元へは伝播しない）
#[derive(Debug, Error)]
pub enum CheckError {
    /// 接続・DNS・TLS・タイムアウト等のトランスポートエラー
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// HTTPメソッドとして解釈できない
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// ヘッダー名または値が不正
    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),
}

/// ヘルスチェッカーの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerSettings {
    /// リクエスト全体のタイムアウト
    pub request_timeout: Duration,
    /// UP判定となるレイテンシの上限（この値未満でUP）
    pub max_latency: Duration,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_latency: Duration::from_millis(DEFAULT_MAX_LATENCY_MS),
        }
    }
}

impl From<&MonitorConfig> for CheckerSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            max_latency: config.max_latency(),
        }
    }
}

/// 判定ルール
///
/// ステータスコードが[200, 300)の範囲、かつレイテンシが`max_latency`未満の場合のみUP。
pub fn classify(status: u16, latency: Duration, max_latency: Duration) -> HealthVerdict {
    if (200..300).contains(&status) && latency < max_latency {
        HealthVerdict::Up
    } else {
        HealthVerdict::Down
    }
}

/// 設定のヘッダーを検証して`HeaderMap`に変換する
fn build_headers(endpoint: &EndpointDescriptor) -> Result<HeaderMap, CheckError> {
    let mut headers = HeaderMap::with_capacity(endpoint.headers.len());
    for (name, value) in &endpoint.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| CheckError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| CheckError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// エンドポイントヘルスチェッカー
#[derive(Debug, Clone)]
pub struct EndpointHealthChecker {
    /// HTTPクライアント
    client: Client,
    /// 設定
    settings: CheckerSettings,
}

impl EndpointHealthChecker {
    /// 新しいヘルスチェッカーを作成
    pub fn new(settings: CheckerSettings) -> Result<Self, CheckError> {
        let client = Client::builder().timeout(settings.request_timeout).build()?;

        Ok(Self { client, settings })
    }

    /// リクエストを1回送信し、ステータスとレスポンス完了までの時間を返す
    async fn probe(&self, endpoint: &EndpointDescriptor) -> Result<(StatusCode, Duration), CheckError> {
        let method = Method::from_bytes(endpoint.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| CheckError::InvalidMethod(endpoint.method.clone()))?;

        let headers = build_headers(endpoint)?;

        let mut request = self.client.request(method, &endpoint.url).headers(headers);
        request = match &endpoint.body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Raw(raw) => request.body(raw.clone()),
        };

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        // ボディを読み切るまでをレイテンシとする
        response.bytes().await?;
        let latency = start.elapsed();

        Ok((status, latency))
    }
}

#[async_trait]
impl HealthProbe for EndpointHealthChecker {
    async fn check(&self, endpoint: &EndpointDescriptor) -> HealthVerdict {
        debug!(
            endpoint_name = %endpoint.name,
            url = %endpoint.url,
            "Checking health"
        );

        match self.probe(endpoint).await {
            Ok((status, latency)) => {
                let verdict = classify(status.as_u16(), latency, self.settings.max_latency);
                debug!(
                    endpoint_name = %endpoint.name,
                    url = %endpoint.url,
                    status = status.as_u16(),
                    latency_ms = latency.as_millis() as u64,
                    verdict = %verdict,
                    "Health check finished"
                );
                verdict
            }
            Err(e @ (CheckError::InvalidMethod(_) | CheckError::InvalidHeader(_))) => {
                warn!(
                    endpoint_name = %endpoint.name,
                    url = %endpoint.url,
                    error = %e,
                    "Invalid request definition, treating endpoint as DOWN"
                );
                HealthVerdict::Down
            }
            Err(e) => {
                error!(
                    endpoint_name = %endpoint.name,
                    url = %endpoint.url,
                    error = %e,
                    "Request failed"
                );
                HealthVerdict::Down
            }
        }
    }
}
