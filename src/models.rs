//! チャンネル統計のデータモデル

use crate::analytics::{format_currency, format_number, to_fixed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 配信していないときの表示
pub const OFFLINE_LABEL: &str = "Offline";
/// 配信タイトルが空のときの表示
pub const DEFAULT_STREAM_TITLE: &str = "Live Stream";
/// カテゴリ未設定のときの表示
pub const DEFAULT_CATEGORY: &str = "Just Chatting";
/// アイコン未設定のときの画像
pub const DEFAULT_AVATAR: &str = "assets/default-avatar.png";
/// 取得失敗時にすべての欄へ表示する値
pub const UNAVAILABLE: &str = "N/A";

/// 1回の問い合わせで得たチャンネル情報
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChannelSnapshot {
    /// ユーザー名
    pub username: String,
    /// 同時視聴者数（オフライン時は0）
    pub viewer_count: u64,
    /// フォロワー数
    pub follower_count: u64,
    /// チャンネル作成日時
    pub channel_created_at: Option<DateTime<Utc>>,
    /// 配信カテゴリ（先頭のもの）
    pub primary_category_name: Option<String>,
    /// サブスクライバー数
    pub supporter_count: u64,
    /// アイコンURL
    pub profile_pic: Option<String>,
    /// 配信タイトル
    pub session_title: Option<String>,
    /// 配信中かどうか
    pub is_live: bool,
}

/// スナップショットから算出した指標
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct MetricsResult {
    pub viewers: u64,
    pub followers: u64,
    /// 平均視聴者数（現状は同時視聴者数と同じ）
    pub average_viewers: u64,
    pub chatter_count: u64,
    pub engagement_rate_percent: f64,
    pub bot_score_percent: f64,
    pub hourly_rate_usd: f64,
}

/// 配信者情報の表示内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamerInfo {
    pub name: String,
    pub avatar_url: String,
    pub title: String,
    pub category: String,
    pub is_live: bool,
    pub watch_url: String,
}

impl StreamerInfo {
    pub fn from_snapshot(snapshot: &ChannelSnapshot) -> Self {
        let (title, category) = if snapshot.is_live {
            (
                snapshot
                    .session_title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_STREAM_TITLE.to_string()),
                snapshot
                    .primary_category_name
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            )
        } else {
            (OFFLINE_LABEL.to_string(), OFFLINE_LABEL.to_string())
        };

        Self {
            name: snapshot.username.clone(),
            avatar_url: snapshot
                .profile_pic
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            title,
            category,
            is_live: snapshot.is_live,
            watch_url: format!("https://kick.com/{}", snapshot.username),
        }
    }
}

/// 統計カードに表示する文字列
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsDisplay {
    pub live_viewers: String,
    pub followers: String,
    pub average_viewers: String,
    pub active_chatters: String,
    pub engagement_rate: String,
    pub bot_percentage: String,
    pub hourly_rate: String,
}

impl StatsDisplay {
    pub fn from_metrics(metrics: &MetricsResult) -> Self {
        Self {
            live_viewers: format_number(metrics.viewers),
            followers: format_number(metrics.followers),
            average_viewers: format_number(metrics.average_viewers),
            active_chatters: format_number(metrics.chatter_count),
            engagement_rate: format!("{}%", to_fixed(metrics.engagement_rate_percent, 1)),
            bot_percentage: format!("{}%", to_fixed(metrics.bot_score_percent, 1)),
            hourly_rate: format!("${}", format_currency(metrics.hourly_rate_usd)),
        }
    }

    /// 取得失敗時の表示。一部だけ表示することはしない
    pub fn unavailable() -> Self {
        Self {
            live_viewers: UNAVAILABLE.to_string(),
            followers: UNAVAILABLE.to_string(),
            average_viewers: UNAVAILABLE.to_string(),
            active_chatters: UNAVAILABLE.to_string(),
            engagement_rate: UNAVAILABLE.to_string(),
            bot_percentage: UNAVAILABLE.to_string(),
            hourly_rate: UNAVAILABLE.to_string(),
        }
    }

    /// ラベル付きの一覧（表示順）
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("Live Viewers", self.live_viewers.as_str()),
            ("Followers", self.followers.as_str()),
            ("Avg Viewers", self.average_viewers.as_str()),
            ("Active Chatters", self.active_chatters.as_str()),
            ("Engagement Rate", self.engagement_rate.as_str()),
            ("Bot Percentage", self.bot_percentage.as_str()),
            ("KPP Hourly Rate", self.hourly_rate.as_str()),
        ]
    }
}

/// 1回分の更新結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelReport {
    pub snapshot: ChannelSnapshot,
    pub metrics: MetricsResult,
    pub streamer: StreamerInfo,
    pub display: StatsDisplay,
    pub fetched_at: DateTime<Utc>,
}

impl ChannelReport {
    pub fn new(snapshot: ChannelSnapshot, metrics: MetricsResult, fetched_at: DateTime<Utc>) -> Self {
        let streamer = StreamerInfo::from_snapshot(&snapshot);
        let display = StatsDisplay::from_metrics(&metrics);
        Self {
            snapshot,
            metrics,
            streamer,
            display,
            fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_snapshot() -> ChannelSnapshot {
        ChannelSnapshot {
            username: "xqc".to_string(),
            viewer_count: 1_500,
            is_live: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_streamer_info_live_defaults() {
        let info = StreamerInfo::from_snapshot(&live_snapshot());
        assert_eq!(info.title, DEFAULT_STREAM_TITLE);
        assert_eq!(info.category, DEFAULT_CATEGORY);
        assert_eq!(info.avatar_url, DEFAULT_AVATAR);
        assert_eq!(info.watch_url, "https://kick.com/xqc");
        assert!(info.is_live);
    }

    #[test]
    fn test_streamer_info_offline() {
        let snapshot = ChannelSnapshot {
            username: "xqc".to_string(),
            session_title: Some("ignored".to_string()),
            primary_category_name: Some("Slots".to_string()),
            ..Default::default()
        };
        let info = StreamerInfo::from_snapshot(&snapshot);
        assert_eq!(info.title, OFFLINE_LABEL);
        assert_eq!(info.category, OFFLINE_LABEL);
        assert!(!info.is_live);
    }

    #[test]
    fn test_stats_display_formatting() {
        let metrics = MetricsResult {
            viewers: 1_500,
            followers: 2_500_000,
            average_viewers: 1_500,
            chatter_count: 150,
            engagement_rate_percent: 10.0,
            bot_score_percent: 30.0,
            hourly_rate_usd: 6362.57,
        };
        let display = StatsDisplay::from_metrics(&metrics);
        assert_eq!(display.live_viewers, "1.5K");
        assert_eq!(display.followers, "2.5M");
        assert_eq!(display.active_chatters, "150");
        assert_eq!(display.engagement_rate, "10.0%");
        assert_eq!(display.bot_percentage, "30.0%");
        assert_eq!(display.hourly_rate, "$6,362.57");
    }

    #[test]
    fn test_stats_display_unavailable_is_uniform() {
        let display = StatsDisplay::unavailable();
        assert!(display.fields().iter().all(|(_, value)| *value == UNAVAILABLE));
    }
}
