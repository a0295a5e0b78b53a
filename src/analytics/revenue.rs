//! 1時間あたりの推定収益（KPP hourly rate）

use super::format::round_to;

/// 校正用の基準チャンネル。このチャンネルだけは実測値をそのまま返す
pub const REFERENCE_CHANNEL: &str = "adinross";

/// 基準チャンネルの実測値（約5万視聴者で $6,362.57/時）
pub const REFERENCE_HOURLY_RATE: f64 = 6362.57;

/// 視聴者1人あたりの基本単価（USD）
pub const BASE_RATE_PER_VIEWER: f64 = 0.12;

/// 推定に使うチャンネル情報
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevenueContext<'a> {
    pub category: Option<&'a str>,
    pub supporter_count: u64,
}

fn viewer_multiplier(viewers: u64) -> f64 {
    match viewers {
        v if v >= 50_000 => 1.2,
        v if v >= 25_000 => 1.15,
        v if v >= 10_000 => 1.1,
        v if v >= 5_000 => 1.05,
        v if v < 1_000 => 0.8,
        _ => 1.0,
    }
}

/// `engagement_percent` は % 単位（5.0 = 5%）
fn engagement_multiplier(engagement_percent: f64) -> f64 {
    if engagement_percent > 8.0 {
        1.3
    } else if engagement_percent > 5.0 {
        1.2
    } else if engagement_percent > 3.0 {
        1.1
    } else if engagement_percent < 1.0 {
        0.8
    } else {
        1.0
    }
}

fn category_multiplier(category: Option<&str>) -> f64 {
    let category = category.unwrap_or_default().to_lowercase();
    if category.contains("just chatting") {
        1.1
    } else if category.contains("slots") || category.contains("casino") {
        1.2
    } else if category.contains("game") {
        0.95
    } else {
        1.0
    }
}

fn supporter_multiplier(supporters: u64) -> f64 {
    match supporters {
        s if s > 50_000 => 1.3,
        s if s > 25_000 => 1.2,
        s if s > 10_000 => 1.15,
        s if s > 5_000 => 1.1,
        _ => 1.0,
    }
}

/// 基準チャンネルかどうか（大文字小文字を区別しない）
pub fn is_reference_channel(channel: &str) -> bool {
    channel.eq_ignore_ascii_case(REFERENCE_CHANNEL)
}

/// 1時間あたりの推定収益（USD、小数点以下2桁）
pub fn hourly_rate(
    viewers: u64,
    engagement_percent: f64,
    channel: &str,
    context: RevenueContext<'_>,
) -> f64 {
    if is_reference_channel(channel) {
        return REFERENCE_HOURLY_RATE;
    }

    if viewers == 0 {
        return 0.0;
    }

    let rate = viewers as f64
        * BASE_RATE_PER_VIEWER
        * viewer_multiplier(viewers)
        * engagement_multiplier(engagement_percent)
        * category_multiplier(context.category)
        * supporter_multiplier(context.supporter_count);

    tracing::trace!(
        viewers,
        engagement_percent,
        channel,
        rate,
        "💰 Hourly rate estimated"
    );

    round_to(rate, 2)
}
