//! kicklytics - Kick チャンネル統計ツール
//!
//! 使用例:
//!   kicklytics xqc
//!   kicklytics xqc --watch --interval 15
//!   kicklytics --link "http://localhost:8080/?channel=xqc" --share

use anyhow::{Context, Result};
use clap::Parser;
use kicklytics::{
    config::{AppConfig, ConfigManager},
    monitor::{refresh_channel, ChannelMonitor},
    presenter::{JsonPresenter, StatsPresenter, TerminalPresenter},
    share::{self, ShareLinks},
    utils, ChannelName, ChannelSource, KickClient,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "kicklytics", version, about = "Kick channel stats: engagement, bot score and hourly rate estimates")]
struct Cli {
    /// チャンネル名
    channel: Option<String>,

    /// 共有リンク（?channel=... 付きURL）からチャンネルを指定
    #[arg(long, conflicts_with = "channel")]
    link: Option<String>,

    /// 定期的に更新し続ける（Ctrl+Cで終了）
    #[arg(short, long)]
    watch: bool,

    /// 更新間隔（秒）。設定ファイルの値より優先
    #[arg(short, long)]
    interval: Option<u64>,

    /// 1行1JSONで出力
    #[arg(long)]
    json: bool,

    /// 共有用のツイートURLとリンクを表示
    #[arg(long)]
    share: bool,

    /// 設定ファイルのパス
    #[arg(long)]
    config: Option<PathBuf>,

    /// APIのベースURL。設定ファイルの値より優先
    #[arg(long)]
    api_base: Option<String>,

    /// デフォルト設定ファイルを書き出して終了
    #[arg(long)]
    init_config: bool,
}

/// 設定を読み込む。読み込みエラーはログ初期化後に報告するため値で返す
fn load_config(cli: &Cli) -> Result<(ConfigManager, AppConfig, Option<anyhow::Error>)> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let (mut config, load_error) = manager.load_with_fallback();

    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }
    if let Some(api_base) = &cli.api_base {
        config.api_base_url = api_base.clone();
    }

    Ok((manager, config, load_error))
}

fn resolve_channel(cli: &Cli) -> Result<ChannelName> {
    if let Some(link) = &cli.link {
        return share::channel_from_link(link)?
            .with_context(|| format!("No channel parameter in link: {}", link));
    }

    let raw = cli.channel.as_deref().unwrap_or_default();
    ChannelName::parse(raw).context("Please enter a channel name")
}

async fn run_once(
    cli: &Cli,
    config: &AppConfig,
    source: &dyn ChannelSource,
    presenter: &dyn StatsPresenter,
    channel: &ChannelName,
) -> Result<()> {
    let Some(report) = refresh_channel(source, presenter, channel).await else {
        anyhow::bail!("Stats unavailable for {}", channel);
    };

    if cli.share {
        let links = ShareLinks::from_report(&report, &config.share_base_url)?;
        presenter.show_share(channel.as_str(), &links);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (manager, config, load_error) = load_config(&cli)?;

    if cli.init_config {
        manager.save_config(&AppConfig::default())?;
        println!("{}", manager.config_path().display());
        return Ok(());
    }

    let _log_guard = utils::init_logging(&config.log)?;

    tracing::info!("🎬 Starting kicklytics");
    match load_error {
        Some(e) => tracing::warn!("設定読み込みエラー、デフォルト設定を使用: {:#}", e),
        None => tracing::info!("📄 Config: {}", manager.config_path().display()),
    }

    let channel = resolve_channel(&cli)?;
    let client = KickClient::new(
        config.api_base_url.clone(),
        config.request_timeout(),
        &config.user_agent,
    )?;

    let presenter: Arc<dyn StatsPresenter> = if cli.json {
        Arc::new(JsonPresenter::stdout())
    } else {
        Arc::new(TerminalPresenter::stdout())
    };

    if !cli.watch {
        return run_once(&cli, &config, &client, presenter.as_ref(), &channel).await;
    }

    let mut monitor = ChannelMonitor::new(Arc::new(client), presenter, config.poll_interval());
    monitor.start(channel).await;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    tracing::info!("🛑 終了シグナルを受信しました");

    monitor.stop().await;
    tracing::info!("👋 kicklytics shutting down");
    Ok(())
}
