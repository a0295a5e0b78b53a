//! チャンネル指標の算出エンジン
//!
//! 内部状態を持たない純粋な計算のみ。現在時刻もチャンネル年齢の算出にしか使わず、
//! 引数で受け取る。

pub mod bot_score;
pub mod engagement;
pub mod format;
pub mod revenue;

pub use bot_score::{bot_score, BotScoreInput, MAX_BOT_SCORE};
pub use engagement::{engagement_rate, estimate_chatters};
pub use format::{format_currency, format_number, round_to, to_fixed};
pub use revenue::{
    hourly_rate, is_reference_channel, RevenueContext, REFERENCE_CHANNEL, REFERENCE_HOURLY_RATE,
};

use crate::models::{ChannelSnapshot, MetricsResult};
use chrono::{DateTime, Utc};

/// 作成日時が分からないチャンネルの年齢（日）
pub const DEFAULT_CHANNEL_AGE_DAYS: i64 = 30;

/// チャンネル作成からの経過日数（切り捨て）
pub fn channel_age_days(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    created_at
        .map(|created| (now - created).num_days())
        .unwrap_or(DEFAULT_CHANNEL_AGE_DAYS)
}

/// スナップショットから全指標を算出
pub fn compute_metrics(snapshot: &ChannelSnapshot, now: DateTime<Utc>) -> MetricsResult {
    let viewers = snapshot.viewer_count;
    let chatters = estimate_chatters(viewers);
    let engagement = engagement_rate(chatters, viewers);

    let hourly = hourly_rate(
        viewers,
        engagement,
        &snapshot.username,
        RevenueContext {
            category: snapshot.primary_category_name.as_deref(),
            supporter_count: snapshot.supporter_count,
        },
    );

    let bot = bot_score(BotScoreInput {
        chatters,
        viewers,
        followers: snapshot.follower_count,
        channel_age_days: channel_age_days(snapshot.channel_created_at, now),
    });

    tracing::debug!(
        channel = %snapshot.username,
        viewers,
        chatters,
        engagement,
        bot,
        hourly,
        "📊 Metrics computed"
    );

    MetricsResult {
        viewers,
        followers: snapshot.follower_count,
        average_viewers: viewers,
        chatter_count: chatters,
        engagement_rate_percent: engagement,
        bot_score_percent: bot,
        hourly_rate_usd: hourly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_channel_age_days() {
        let now = now();
        assert_eq!(channel_age_days(None, now), 30);
        assert_eq!(channel_age_days(Some(now - Duration::days(3)), now), 3);
        // 端数は切り捨て
        assert_eq!(
            channel_age_days(Some(now - Duration::days(6) - Duration::hours(23)), now),
            6
        );
    }

    #[test]
    fn test_offline_snapshot_yields_zeroes() {
        let snapshot = ChannelSnapshot {
            username: "sleepy".to_string(),
            follower_count: 1_234,
            ..Default::default()
        };
        let metrics = compute_metrics(&snapshot, now());
        assert_eq!(metrics.chatter_count, 0);
        assert_eq!(metrics.engagement_rate_percent, 0.0);
        assert_eq!(metrics.bot_score_percent, 0.0);
        assert_eq!(metrics.hourly_rate_usd, 0.0);
        assert_eq!(metrics.followers, 1_234);
    }

    #[test]
    fn test_ten_thousand_viewers_pipeline() {
        let snapshot = ChannelSnapshot {
            username: "bigstreamer".to_string(),
            viewer_count: 10_000,
            follower_count: 20_000,
            channel_created_at: Some(now() - Duration::days(60)),
            is_live: true,
            ..Default::default()
        };
        let metrics = compute_metrics(&snapshot, now());
        // 10000 以上は 3%
        assert_eq!(metrics.chatter_count, 300);
        assert_eq!(metrics.engagement_rate_percent, 3.0);
        // 0.03 → 基礎 75、キリ番 +10
        assert_eq!(metrics.bot_score_percent, 85.0);
        // 10000 × 0.12 × 1.1 × 1.0 = 1320
        assert_eq!(metrics.hourly_rate_usd, 1_320.0);
    }

    #[test]
    fn test_reference_channel_pipeline() {
        let snapshot = ChannelSnapshot {
            username: "AdinRoss".to_string(),
            viewer_count: 0,
            ..Default::default()
        };
        let metrics = compute_metrics(&snapshot, now());
        assert_eq!(metrics.hourly_rate_usd, REFERENCE_HOURLY_RATE);
        assert_eq!(metrics.bot_score_percent, 0.0);
    }
}
