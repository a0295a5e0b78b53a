pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod presenter;
pub mod share;
pub mod utils;

// Re-export the main error types for convenience
pub use error::{KickError, KickResult};

// Re-export the metrics engine
pub use analytics::{
    bot_score, compute_metrics, engagement_rate, estimate_chatters, format_number, hourly_rate,
    BotScoreInput, RevenueContext,
};

// Re-export the HTTP client and session types
pub use api::kick::{ChannelName, ChannelSource, KickClient};
pub use monitor::{refresh_channel, ChannelMonitor, MonitorStats};
pub use presenter::{JsonPresenter, StatsPresenter, TerminalPresenter};

// Re-export data models
pub use models::{ChannelReport, ChannelSnapshot, MetricsResult, StatsDisplay, StreamerInfo};
