//! チャット参加者数の推定とエンゲージメント率

use super::format::round_to;

/// 視聴者数の帯ごとのチャット参加率
///
/// 視聴者が多いほどチャットに書き込む割合は下がる。
fn chatter_ratio(viewers: u64) -> f64 {
    match viewers {
        0..=499 => 0.15,
        500..=1_999 => 0.10,
        2_000..=9_999 => 0.05,
        _ => 0.03,
    }
}

/// 視聴者数からアクティブなチャット参加者数を推定
pub fn estimate_chatters(viewers: u64) -> u64 {
    (viewers as f64 * chatter_ratio(viewers)).floor() as u64
}

/// エンゲージメント率（%、小数点以下1桁）
///
/// 視聴者数が0の場合は0を返す。
pub fn engagement_rate(chatters: u64, viewers: u64) -> f64 {
    if viewers == 0 {
        return 0.0;
    }
    round_to(chatters as f64 / viewers as f64 * 100.0, 1)
}
