//! 共有用のテキスト・リンク生成

use crate::api::kick::ChannelName;
use crate::error::{KickError, KickResult};
use crate::models::ChannelReport;
use reqwest::Url;
use serde::Serialize;

/// 共有リンクでチャンネル名を渡すクエリパラメータ
pub const CHANNEL_QUERY_PARAM: &str = "channel";

const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";

/// 共有テキストに載せる値（表示済みの文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareStats {
    pub viewers: String,
    /// `%` を除いた値
    pub engagement_rate: String,
    /// `$` を除いた値
    pub hourly_rate: String,
}

impl ShareStats {
    pub fn from_report(report: &ChannelReport) -> Self {
        let display = &report.display;
        Self {
            viewers: display.live_viewers.clone(),
            engagement_rate: display.engagement_rate.trim_end_matches('%').to_string(),
            hourly_rate: display.hourly_rate.trim_start_matches('$').to_string(),
        }
    }
}

/// 共有用のツイートURLとダッシュボードへのリンク
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub tweet_url: String,
    pub link: String,
}

impl ShareLinks {
    pub fn from_report(report: &ChannelReport, base_url: &str) -> KickResult<Self> {
        let name = &report.streamer.name;
        Ok(Self {
            tweet_url: tweet_intent_url(name, &ShareStats::from_report(report)),
            link: share_link(base_url, name)?,
        })
    }
}

/// ツイート本文
pub fn tweet_text(channel: &str, stats: &ShareStats) -> String {
    format!(
        "Check out {}'s Kick stats:\n👥 {} viewers\n💬 {}% engagement\n💰 ${}/hour potential earnings\n\nvia Kick Analytics",
        channel, stats.viewers, stats.engagement_rate, stats.hourly_rate
    )
}

/// ツイート投稿画面のURL
pub fn tweet_intent_url(channel: &str, stats: &ShareStats) -> String {
    format!(
        "{}?text={}",
        TWEET_INTENT_URL,
        urlencoding::encode(&tweet_text(channel, stats))
    )
}

/// チャンネルを開いた状態のダッシュボードへのリンク
///
/// `base_url` のクエリとフラグメントは捨てる。
pub fn share_link(base_url: &str, channel: &str) -> KickResult<String> {
    let base = Url::parse(base_url)
        .map_err(|e| KickError::Config(format!("invalid share base url {:?}: {}", base_url, e)))?;

    Ok(format!(
        "{}{}?{}={}",
        base.origin().ascii_serialization(),
        base.path(),
        CHANNEL_QUERY_PARAM,
        urlencoding::encode(channel)
    ))
}

/// 共有リンクからチャンネル名を取り出す
///
/// パラメータがない、または空の場合は None。
pub fn channel_from_link(link: &str) -> KickResult<Option<ChannelName>> {
    let url = Url::parse(link)
        .map_err(|e| KickError::InvalidChannel(format!("{} ({})", link, e)))?;

    Ok(url
        .query_pairs()
        .find(|(key, _)| key == CHANNEL_QUERY_PARAM)
        .and_then(|(_, value)| ChannelName::parse(&value).ok()))
}
