//! 表示層のポート
//!
//! 指標エンジンの出力（プレーンな値）を受け取って描画する。描画方法は実装側の自由。

use crate::models::{ChannelReport, StatsDisplay};
use crate::share::ShareLinks;
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;

/// 統計表示の受け口
pub trait StatsPresenter: Send + Sync {
    /// 更新開始
    fn show_loading(&self, _channel: &str) {}

    /// 取得・計算に成功した
    fn show_report(&self, report: &ChannelReport);

    /// 取得に失敗した。すべての欄を利用不可として表示する
    fn show_unavailable(&self, channel: &str);

    /// 更新終了（成功・失敗に関わらず呼ばれる）
    fn hide_loading(&self, _channel: &str) {}

    /// 共有用リンク
    fn show_share(&self, _channel: &str, _links: &ShareLinks) {}
}

/// 統計カードをテキストで組み立てる
pub fn render_card(report: &ChannelReport) -> String {
    let streamer = &report.streamer;
    let live = if streamer.is_live { "🔴 LIVE" } else { "⚫ OFFLINE" };

    let mut card = String::new();
    card.push_str(&format!("{}  {}\n", streamer.name, live));
    card.push_str(&format!("  {}\n", streamer.title));
    card.push_str(&format!("  Category: {}\n", streamer.category));
    card.push_str(&render_fields(&report.display));
    if streamer.is_live {
        card.push_str(&format!("  Watch: {}\n", streamer.watch_url));
    }
    card.push_str(&format!(
        "  Updated: {}\n",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    card
}

fn render_fields(display: &StatsDisplay) -> String {
    display
        .fields()
        .iter()
        .map(|(label, value)| format!("  {:<16} {}\n", label, value))
        .collect()
}

/// 端末に統計カードを出力する
pub struct TerminalPresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!("⚠️ Failed to write stats: {}", e);
        }
    }
}

impl<W: Write + Send> StatsPresenter for TerminalPresenter<W> {
    fn show_loading(&self, channel: &str) {
        tracing::debug!("⏳ Loading stats for {}", channel);
    }

    fn show_report(&self, report: &ChannelReport) {
        self.write(&format!("{}\n", render_card(report)));
    }

    fn show_unavailable(&self, channel: &str) {
        let text = format!(
            "{}  ⚠️ unavailable\n{}\n",
            channel,
            render_fields(&StatsDisplay::unavailable())
        );
        self.write(&text);
    }

    fn show_share(&self, _channel: &str, links: &ShareLinks) {
        self.write(&format!("Tweet: {}\nLink:  {}\n", links.tweet_url, links.link));
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Report(&'a ChannelReport),
    Unavailable {
        channel: &'a str,
        display: StatsDisplay,
    },
    Share {
        channel: &'a str,
        tweet_url: &'a str,
        link: &'a str,
    },
}

/// 1行1JSONで出力する（他ツールとの連携用）
pub struct JsonPresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl JsonPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, event: &JsonEvent<'_>) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("❌ Failed to serialize stats: {}", e);
                return;
            }
        };
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("⚠️ Failed to write stats: {}", e);
        }
    }
}

impl<W: Write + Send> StatsPresenter for JsonPresenter<W> {
    fn show_report(&self, report: &ChannelReport) {
        self.emit(&JsonEvent::Report(report));
    }

    fn show_unavailable(&self, channel: &str) {
        self.emit(&JsonEvent::Unavailable {
            channel,
            display: StatsDisplay::unavailable(),
        });
    }

    fn show_share(&self, channel: &str, links: &ShareLinks) {
        self.emit(&JsonEvent::Share {
            channel,
            tweet_url: &links.tweet_url,
            link: &links.link,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute_metrics;
    use crate::models::ChannelSnapshot;
    use chrono::{TimeZone, Utc};

    fn report() -> ChannelReport {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let snapshot = ChannelSnapshot {
            username: "trainwreckstv".to_string(),
            viewer_count: 1_500,
            follower_count: 50_000,
            primary_category_name: Some("Slots & Casino".to_string()),
            session_title: Some("high rollin".to_string()),
            is_live: true,
            ..Default::default()
        };
        let metrics = compute_metrics(&snapshot, now);
        ChannelReport::new(snapshot, metrics, now)
    }

    #[test]
    fn test_render_card_contains_all_fields() {
        let card = render_card(&report());
        assert!(card.contains("trainwreckstv"));
        assert!(card.contains("LIVE"));
        assert!(card.contains("high rollin"));
        assert!(card.contains("Slots & Casino"));
        assert!(card.contains("Live Viewers"));
        assert!(card.contains("1.5K"));
        assert!(card.contains("KPP Hourly Rate"));
        assert!(card.contains("https://kick.com/trainwreckstv"));
        assert!(card.contains("2025-03-01 09:30:00 UTC"));
    }

    #[test]
    fn test_terminal_unavailable_shows_na_everywhere() {
        let presenter = TerminalPresenter::new(Vec::new());
        presenter.show_unavailable("ghost");
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(text.contains("ghost"));
        assert_eq!(text.matches("N/A").count(), 7);
    }

    #[test]
    fn test_json_presenter_lines() {
        let presenter = JsonPresenter::new(Vec::new());
        presenter.show_report(&report());
        presenter.show_unavailable("ghost");
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "report");
        assert_eq!(first["snapshot"]["username"], "trainwreckstv");
        assert_eq!(first["display"]["live_viewers"], "1.5K");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "unavailable");
        assert_eq!(second["channel"], "ghost");
        assert_eq!(second["display"]["hourly_rate"], "N/A");
    }

    fn links() -> ShareLinks {
        ShareLinks {
            tweet_url: "https://twitter.com/intent/tweet?text=hi".to_string(),
            link: "http://localhost:8080/?channel=trainwreckstv".to_string(),
        }
    }

    #[test]
    fn test_json_share_stays_json_lines() {
        let presenter = JsonPresenter::new(Vec::new());
        presenter.show_report(&report());
        presenter.show_share("trainwreckstv", &links());
        let text = String::from_utf8(presenter.into_inner()).unwrap();

        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["event"], "share");
        assert_eq!(lines[1]["channel"], "trainwreckstv");
        assert_eq!(lines[1]["link"], "http://localhost:8080/?channel=trainwreckstv");
        assert_eq!(lines[1]["tweet_url"], "https://twitter.com/intent/tweet?text=hi");
    }

    #[test]
    fn test_terminal_share_lines() {
        let presenter = TerminalPresenter::new(Vec::new());
        presenter.show_share("trainwreckstv", &links());
        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(
            text,
            "Tweet: https://twitter.com/intent/tweet?text=hi\nLink:  http://localhost:8080/?channel=trainwreckstv\n"
        );
    }
}
