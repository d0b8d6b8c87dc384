//! 共通型定義
//!
//! EndpointDescriptor, RequestBody, Domain, HealthVerdict等のコアデータ型

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::{Host, Url};

/// デフォルトのHTTPメソッド
pub const DEFAULT_METHOD: &str = "GET";

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

/// 監視対象エンドポイント
///
/// 設定ファイルから一度だけ生成され、以降は全サイクルで読み取り専用として共有される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// エンドポイント名（必須・空文字不可）
    pub name: String,
    /// チェック対象URL（必須）
    pub url: String,
    /// HTTPメソッド (デフォルト: "GET")
    #[serde(default = "default_method")]
    pub method: String,
    /// 追加リクエストヘッダー
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// リクエストボディ（読み込み時にJSON/生文字列を判定済み）
    #[serde(default)]
    pub body: RequestBody,
}

impl EndpointDescriptor {
    /// 名前とURLだけを指定して作成（その他はデフォルト値）
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: default_method(),
            headers: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// HTTPメソッドを設定
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// リクエストヘッダーを追加
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// 生のボディ文字列を設定（JSON判定は`parse_body`に従う）
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = parse_body(Some(body));
        self
    }

    /// 集計キーとなるドメインを取得
    pub fn domain(&self) -> Domain {
        extract_domain(&self.url)
    }
}

/// リクエストボディ
///
/// 設定値の文字列がJSONとして妥当ならJSON、そうでなければ生文字列として送信する。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum RequestBody {
    /// ボディなし
    #[default]
    Empty,
    /// JSONペイロード
    Json(serde_json::Value),
    /// 生文字列ペイロード
    Raw(String),
}

impl RequestBody {
    /// ボディが無いかどうか
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Option<String>> for RequestBody {
    fn from(raw: Option<String>) -> Self {
        parse_body(raw.as_deref())
    }
}

impl From<RequestBody> for Option<String> {
    fn from(body: RequestBody) -> Self {
        match body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => Some(value.to_string()),
            RequestBody::Raw(raw) => Some(raw),
        }
    }
}

/// ボディ文字列を解析
///
/// - `None` または空文字 → [`RequestBody::Empty`]
/// - JSONとして妥当 → [`RequestBody::Json`]
/// - それ以外 → [`RequestBody::Raw`]
pub fn parse_body(raw: Option<&str>) -> RequestBody {
    match raw {
        None | Some("") => RequestBody::Empty,
        Some(text) => match serde_json::from_str(text) {
            Ok(value) => RequestBody::Json(value),
            Err(_) => RequestBody::Raw(text.to_string()),
        },
    }
}

/// 集計キーとなるドメイン
///
/// URLからホスト名を取得できなかったエンドポイントは`Unknown`にまとめて集計する。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    /// ホスト名（ポートを含まない）
    Host(String),
    /// ホスト名を解決できなかったURL
    Unknown,
}

impl Domain {
    /// ホスト名から作成
    pub fn host(host: impl Into<String>) -> Self {
        Self::Host(host.into())
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host(host) => f.write_str(host),
            Self::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// URLからドメイン（ホスト名）を抽出
///
/// ポート番号は含めない。解析できないURLやホストを持たないURLは
/// [`Domain::Unknown`] を返す。
pub fn extract_domain(url: &str) -> Domain {
    let Ok(parsed) = Url::parse(url) else {
        return Domain::Unknown;
    };

    match parsed.host() {
        Some(Host::Domain(host)) if !host.is_empty() => Domain::Host(host.to_ascii_lowercase()),
        Some(Host::Ipv4(addr)) => Domain::Host(addr.to_string()),
        Some(Host::Ipv6(addr)) => Domain::Host(addr.to_string()),
        _ => Domain::Unknown,
    }
}

/// ヘルスチェック判定結果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthVerdict {
    /// 稼働中
    Up,
    /// 停止中
    Down,
}

impl HealthVerdict {
    /// 稼働中かどうか
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// HealthVerdictを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
