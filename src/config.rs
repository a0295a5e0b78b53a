//! アプリケーション設定管理モジュール
//!
//! XDGディレクトリの `config.toml` から設定を読み込む。ファイルがなければデフォルト値。

use crate::api::kick::{DEFAULT_API_BASE, DEFAULT_USER_AGENT};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// ログ設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// ログレベル (trace/debug/info/warn/error)。RUST_LOG が優先
    pub log_level: String,
    /// ファイル出力有効化
    pub enable_file_logging: bool,
    /// カスタムログディレクトリ（Noneの場合はXDGデフォルト使用）
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logging: false,
            log_dir: None,
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// チャンネルAPIのベースURL
    pub api_base_url: String,
    /// 更新間隔（秒）
    pub poll_interval_secs: u64,
    /// HTTPタイムアウト（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// 共有リンクの基点となるダッシュボードURL
    pub share_base_url: String,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            poll_interval_secs: 30,
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            share_base_url: "http://localhost:8080/".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// 0秒の間隔は1秒に切り上げる
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// 設定管理マネージャー
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// XDG設定ディレクトリを使う
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: Self::get_config_path()?,
        })
    }

    /// 任意のパスを使う
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "kicklytics", "kicklytics")
            .context("Failed to get project directories")
    }

    /// XDGディレクトリに基づく設定ファイルパスを取得
    fn get_config_path() -> Result<PathBuf> {
        let config_file = Self::project_dirs()?.config_dir().join("config.toml");
        debug!("Config file path: {}", config_file.display());
        Ok(config_file)
    }

    /// デフォルトのログ出力先
    pub fn default_log_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("logs"))
    }

    /// 設定を読み込み
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!(
                "Config file not found, using default settings: {}",
                self.config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let config_content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: AppConfig = toml::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        info!(
            "✅ Configuration loaded from: {}",
            self.config_path.display()
        );

        Ok(config)
    }

    /// 読み込みに失敗したらデフォルト設定を使い、エラーは値として返す
    ///
    /// ログ初期化前に呼ぶ場合、呼び出し側が初期化後にエラーを報告する。
    pub fn load_with_fallback(&self) -> (AppConfig, Option<anyhow::Error>) {
        match self.load_config() {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(e)),
        }
    }

    /// 読み込みに失敗したらデフォルト設定を使う
    pub fn load_or_default(&self) -> AppConfig {
        let (config, error) = self.load_with_fallback();
        if let Some(e) = error {
            warn!("設定読み込みエラー、デフォルト設定を使用: {:#}", e);
        }
        config
    }

    /// 設定を保存
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let config_content =
            toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, config_content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        info!("💾 Configuration saved to: {}", self.config_path.display());

        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 設定ファイルが存在するかチェック
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}
