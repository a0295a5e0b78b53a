// ログ初期化などのユーティリティ

use crate::config::{ConfigManager, LogConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// ログ初期化
///
/// 標準エラー出力へのコンパクト表示に加え、設定で有効なら日次ローテーションのファイルにも出す。
/// 戻り値のガードはプロセス終了まで保持すること（破棄するとファイル出力が止まる）。
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .or_else(|_| EnvFilter::try_new("info"))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let (file_layer, guard) = if config.enable_file_logging {
        let log_dir = match &config.log_dir {
            Some(dir) => dir.clone(),
            None => ConfigManager::default_log_dir()?,
        };
        std::fs::create_dir_all(&log_dir)?;

        let appender = tracing_appender::rolling::daily(&log_dir, "kicklytics.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = config.log_dir.as_ref().filter(|_| config.enable_file_logging) {
        tracing::debug!("📁 Logging to directory: {}", dir.display());
    }

    Ok(guard)
}
