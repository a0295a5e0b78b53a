//! エラー型

use thiserror::Error;

/// kicklytics 全体のエラー
#[derive(Error, Debug)]
pub enum KickError {
    /// HTTP通信の失敗
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// チャンネルが存在しない、またはAPIが非2xxを返した
    #[error("Channel not found: {channel} (status {status})")]
    NotFound { channel: String, status: u16 },

    /// レスポンスJSONの解析失敗
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// チャンネル名が不正
    #[error("Invalid channel name: {0:?}")]
    InvalidChannel(String),

    /// 設定の不備
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KickError {
    pub fn not_found(channel: impl Into<String>, status: u16) -> Self {
        Self::NotFound {
            channel: channel.into(),
            status,
        }
    }
}

pub type KickResult<T> = Result<T, KickError>;
