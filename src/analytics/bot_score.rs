//! ボット視聴の疑わしさスコア
//!
//! 統計的な分類器ではなく、閾値比較と固定の加点で組み立てたヒューリスティック。
//! 各ステップは前のステップの結果に対する clamp として順番に適用される。
//! 順番を入れ替えると結果が変わるので注意。

use super::format::round_to;

/// スコアの上限
pub const MAX_BOT_SCORE: f64 = 95.0;

/// ボットスコアの入力
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotScoreInput {
    pub chatters: u64,
    pub viewers: u64,
    pub followers: u64,
    pub channel_age_days: i64,
}

/// エンゲージメント率（比率）の帯ごとの基礎スコア
fn base_score(rate: f64) -> f64 {
    if rate == 0.0 {
        95.0
    } else if rate < 0.01 {
        90.0
    } else if rate < 0.02 {
        85.0
    } else if rate < 0.03 {
        80.0
    } else if rate < 0.04 {
        75.0
    } else if rate < 0.05 {
        70.0
    } else if rate < 0.07 {
        65.0
    } else if rate < 0.10 {
        60.0
    } else {
        (50.0 - rate * 200.0).max(0.0)
    }
}

/// 加点（条件は互いに独立で、すべて累積する）
fn bonus_score(input: &BotScoreInput, rate: f64, viewer_to_follower: f64) -> f64 {
    let viewers = input.viewers;
    let mut bonus = 0.0;

    if viewers > 1_000 && rate < 0.02 {
        bonus += 10.0;
    }
    if viewers > 5_000 && rate < 0.03 {
        bonus += 15.0;
    }
    if viewers > 10_000 && rate < 0.04 {
        bonus += 20.0;
    }

    if input.channel_age_days < 7 && viewers > 500 {
        bonus += 15.0;
    }

    if viewer_to_follower > 0.5 {
        bonus += 10.0;
    }
    if viewer_to_follower > 0.8 {
        bonus += 15.0;
    }

    bonus
}

/// ボットスコア（%、小数点以下1桁、0〜95）
pub fn bot_score(input: BotScoreInput) -> f64 {
    let viewers = input.viewers;
    if viewers == 0 {
        return 0.0;
    }

    let rate = input.chatters as f64 / viewers as f64;
    let viewer_to_follower = viewers as f64 / input.followers.max(1) as f64;

    let mut score = (base_score(rate) + bonus_score(&input, rate, viewer_to_follower))
        .min(MAX_BOT_SCORE);

    // キリの良い視聴者数は水増しでよく見られる。自然な視聴者数でも誤検知しうる
    if viewers % 100 == 0 && viewers > 500 {
        score = (score + 10.0).min(MAX_BOT_SCORE);
    }

    // 極端に低いエンゲージメントの下限
    if rate < 0.01 {
        score = score.max(75.0);
    }
    if rate < 0.005 {
        score = score.max(85.0);
    }
    if input.chatters == 0 && viewers > 50 {
        score = score.max(90.0);
    }

    round_to(score, 1)
}
