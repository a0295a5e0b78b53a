//! `GET /channels/{name}` のレスポンス型

use crate::models::ChannelSnapshot;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChannelResponse {
    #[serde(default)]
    pub user: User,
    /// 配信していないときは null
    #[serde(default)]
    pub livestream: Option<Livestream>,
    #[serde(rename = "followersCount", default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub subscriber_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct User {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Livestream {
    #[serde(default)]
    pub viewer_count: Option<u64>,
    #[serde(default)]
    pub session_title: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Category {
    #[serde(default)]
    pub name: String,
}

/// 作成日時の文字列を解釈する。解釈できなければ None
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .ok()
}

impl ChannelResponse {
    /// 指標計算用のスナップショットに変換
    ///
    /// `requested` はユーザー名が空だった場合の代わりに使う。
    pub fn into_snapshot(self, requested: &str) -> ChannelSnapshot {
        let username = if self.user.username.is_empty() {
            requested.to_string()
        } else {
            self.user.username
        };

        let channel_created_at = self.created_at.as_deref().and_then(|raw| {
            let parsed = parse_created_at(raw);
            if parsed.is_none() {
                tracing::debug!("🕒 Unparseable created_at: {}", raw);
            }
            parsed
        });

        let is_live = self.livestream.is_some();
        let (viewer_count, session_title, primary_category_name) = match self.livestream {
            Some(live) => (
                live.viewer_count.unwrap_or(0),
                live.session_title,
                live.categories.into_iter().next().map(|c| c.name),
            ),
            None => (0, None, None),
        };

        ChannelSnapshot {
            username,
            viewer_count,
            follower_count: self.followers_count.unwrap_or(0),
            channel_created_at,
            primary_category_name,
            supporter_count: self.subscriber_count.unwrap_or(0),
            profile_pic: self.user.profile_pic,
            session_title,
            is_live,
        }
    }
}
