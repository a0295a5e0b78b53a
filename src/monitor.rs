//! チャンネル監視セッション
//!
//! 定期更新タイマーを所有するオブジェクト。同時に動くタイマーは最大1つで、
//! 新しいチャンネルの監視を始めると前のタイマーは止まる。
//! 1回の更新は取得が終わるまで次のtickを消費しないので、更新同士が重なることはない。

use crate::analytics::compute_metrics;
use crate::api::kick::{ChannelName, ChannelSource};
use crate::models::ChannelReport;
use crate::presenter::StatsPresenter;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// 監視の統計情報
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorStats {
    /// 更新回数（成功・失敗の合計）
    pub refresh_count: u64,
    /// 失敗回数
    pub failure_count: u64,
    /// 最後に成功した時刻
    pub last_success: Option<DateTime<Utc>>,
}

/// 1回分の更新: 取得 → 計算 → 表示
///
/// 取得に失敗した場合は None を返し、表示側にはすべての欄を利用不可として通知する。
pub async fn refresh_channel(
    source: &dyn ChannelSource,
    presenter: &dyn StatsPresenter,
    channel: &ChannelName,
) -> Option<ChannelReport> {
    presenter.show_loading(channel.as_str());

    let report = match source.fetch_channel(channel).await {
        Ok(snapshot) => {
            let now = Utc::now();
            let metrics = compute_metrics(&snapshot, now);
            let report = ChannelReport::new(snapshot, metrics, now);
            presenter.show_report(&report);
            Some(report)
        }
        Err(e) => {
            tracing::error!(channel = %channel, error = %e, "❌ Error updating stats");
            presenter.show_unavailable(channel.as_str());
            None
        }
    };

    presenter.hide_loading(channel.as_str());
    report
}

struct MonitorHandle {
    channel: ChannelName,
    cancel_sender: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
    stats: Arc<Mutex<MonitorStats>>,
}

/// 定期更新を管理するセッション
pub struct ChannelMonitor {
    source: Arc<dyn ChannelSource>,
    presenter: Arc<dyn StatsPresenter>,
    interval: Duration,
    active: Option<MonitorHandle>,
}

impl ChannelMonitor {
    pub fn new(
        source: Arc<dyn ChannelSource>,
        presenter: Arc<dyn StatsPresenter>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            presenter,
            interval,
            active: None,
        }
    }

    /// 監視を開始する。既存の監視は先に停止する
    ///
    /// 最初の更新はすぐに行い、以降は `interval` ごとに更新する。
    pub async fn start(&mut self, channel: ChannelName) {
        self.stop().await;

        let (cancel_sender, cancel_receiver) = oneshot::channel();
        let stats = Arc::new(Mutex::new(MonitorStats::default()));

        let join = tokio::spawn(Self::run(
            self.source.clone(),
            self.presenter.clone(),
            channel.clone(),
            self.interval,
            cancel_receiver,
            stats.clone(),
        ));

        tracing::info!(
            "⏱️ [MONITOR] Started: {} (every {}s)",
            channel,
            self.interval.as_secs_f64()
        );

        self.active = Some(MonitorHandle {
            channel,
            cancel_sender: Some(cancel_sender),
            join,
            stats,
        });
    }

    /// 監視を停止する。実行中の更新は破棄され、停止後に表示が更新されることはない
    pub async fn stop(&mut self) {
        let Some(mut handle) = self.active.take() else {
            return;
        };

        if let Some(sender) = handle.cancel_sender.take() {
            let _ = sender.send(());
        }

        if let Err(e) = (&mut handle.join).await {
            if !e.is_cancelled() {
                tracing::error!("⏱️ [MONITOR] Task failed: {}", e);
            }
        }

        let stats = handle.stats.lock().clone();
        tracing::info!(
            "⏱️ [MONITOR] Stopped: {} ({} refreshes, {} failures)",
            handle.channel,
            stats.refresh_count,
            stats.failure_count
        );
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .map(|handle| !handle.join.is_finished())
            .unwrap_or(false)
    }

    pub fn current_channel(&self) -> Option<&ChannelName> {
        self.active.as_ref().map(|handle| &handle.channel)
    }

    /// 現在の監視の統計（停止中は None）
    pub fn stats(&self) -> Option<MonitorStats> {
        self.active.as_ref().map(|handle| handle.stats.lock().clone())
    }

    async fn run(
        source: Arc<dyn ChannelSource>,
        presenter: Arc<dyn StatsPresenter>,
        channel: ChannelName,
        interval: Duration,
        mut cancel_receiver: oneshot::Receiver<()>,
        stats: Arc<Mutex<MonitorStats>>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancel_receiver => break,
                _ = ticker.tick() => {}
            }

            let report = tokio::select! {
                biased;
                _ = &mut cancel_receiver => {
                    // 取得途中で止めた場合も読み込み表示は終わらせる
                    presenter.hide_loading(channel.as_str());
                    break;
                }
                report = refresh_channel(source.as_ref(), presenter.as_ref(), &channel) => report,
            };

            let mut current = stats.lock();
            current.refresh_count += 1;
            match report {
                Some(report) => current.last_success = Some(report.fetched_at),
                None => current.failure_count += 1,
            }
        }

        tracing::debug!("⏱️ [MONITOR] Loop finished: {}", channel);
    }
}

impl Drop for ChannelMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.join.abort();
        }
    }
}
