pub mod channel;

use crate::api::kick::channel::ChannelResponse;
use crate::error::{KickError, KickResult};
use crate::models::ChannelSnapshot;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://kick.com/api/v1";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 前後の空白を除いたチャンネル名
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct ChannelName(String);

impl ChannelName {
    /// 空のチャンネル名は受け付けない
    pub fn parse(raw: &str) -> KickResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KickError::InvalidChannel(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// チャンネル情報の取得元
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn fetch_channel(&self, channel: &ChannelName) -> KickResult<ChannelSnapshot>;
}

/// Kick公開APIのクライアント
#[derive(Debug, Clone)]
pub struct KickClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl KickClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> KickResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self::with_http_client(base_url, http_client))
    }

    /// 構築済みの reqwest クライアントを使う
    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn channel_url(&self, channel: &ChannelName) -> String {
        format!(
            "{}/channels/{}",
            self.base_url,
            urlencoding::encode(channel.as_str())
        )
    }
}

#[async_trait]
impl ChannelSource for KickClient {
    async fn fetch_channel(&self, channel: &ChannelName) -> KickResult<ChannelSnapshot> {
        let url = self.channel_url(channel);
        tracing::debug!("📡 Fetching channel data: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ HTTP request failed: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("⚠️ Channel {} returned status {}", channel, status);
            return Err(KickError::not_found(channel.as_str(), status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("❌ Failed to read response text: {}", e);
            e
        })?;

        tracing::debug!("📄 Response text length: {} chars", body.len());

        let parsed: ChannelResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("❌ Failed to parse JSON response: {}", e);
            tracing::debug!(
                "🔍 Response text preview: {}",
                body.chars().take(200).collect::<String>()
            );
            e
        })?;

        let snapshot = parsed.into_snapshot(channel.as_str());
        tracing::info!(
            channel = %snapshot.username,
            viewers = snapshot.viewer_count,
            live = snapshot.is_live,
            "✅ Channel data fetched"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// 1回だけ固定レスポンスを返すローカルサーバー。ベースURLを返す
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/api/v1", addr)
    }

    fn local_client(base_url: String) -> KickClient {
        let http_client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        KickClient::with_http_client(base_url, http_client)
    }

    #[tokio::test]
    async fn test_fetch_channel_success() {
        let body = r#"{
            "user": {"username": "xQc", "profile_pic": "https://files.kick.com/xqc.webp"},
            "livestream": {
                "viewer_count": 45210,
                "session_title": "reacting",
                "categories": [{"name": "Just Chatting"}]
            },
            "followersCount": 1200000,
            "subscriber_count": 30000,
            "created_at": "2022-06-21T22:40:08.000000Z"
        }"#;
        let client = local_client(serve_once("200 OK", body).await);

        let snapshot = client
            .fetch_channel(&ChannelName::parse("xqc").unwrap())
            .await
            .unwrap();
        assert_eq!(snapshot.username, "xQc");
        assert_eq!(snapshot.viewer_count, 45_210);
        assert_eq!(snapshot.follower_count, 1_200_000);
        assert_eq!(snapshot.supporter_count, 30_000);
        assert_eq!(snapshot.primary_category_name.as_deref(), Some("Just Chatting"));
        assert!(snapshot.is_live);
        assert!(snapshot.channel_created_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_channel_non_success_is_not_found() {
        let client = local_client(serve_once("404 Not Found", r#"{"message":"Not found"}"#).await);

        let result = client.fetch_channel(&ChannelName::parse("ghost").unwrap()).await;
        match result {
            Err(KickError::NotFound { channel, status }) => {
                assert_eq!(channel, "ghost");
                assert_eq!(status, 404);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_channel_malformed_body_is_parse_error() {
        let client = local_client(serve_once("200 OK", "<html>cloudflare</html>").await);

        let result = client.fetch_channel(&ChannelName::parse("xqc").unwrap()).await;
        assert!(matches!(result, Err(KickError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_channel_connection_refused_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = local_client(format!("http://{}", addr));
        let result = client.fetch_channel(&ChannelName::parse("xqc").unwrap()).await;
        assert!(matches!(result, Err(KickError::Request(_))));
    }

    #[test]
    fn test_channel_name_trims() {
        let name = ChannelName::parse("  xqc \n").unwrap();
        assert_eq!(name.as_str(), "xqc");
        assert_eq!(format!("{}", name), "xqc");
    }

    #[test]
    fn test_channel_name_rejects_empty() {
        assert!(matches!(
            ChannelName::parse("   "),
            Err(KickError::InvalidChannel(_))
        ));
        assert!(ChannelName::parse("").is_err());
    }

    #[test]
    fn test_channel_url() {
        let client = KickClient::new(
            "https://kick.com/api/v1/",
            Duration::from_secs(5),
            DEFAULT_USER_AGENT,
        )
        .unwrap();
        let name = ChannelName::parse("some streamer").unwrap();
        assert_eq!(
            client.channel_url(&name),
            "https://kick.com/api/v1/channels/some%20streamer"
        );
    }
}
