//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for collate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Gateway (batching) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Per-sender usage limits
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Quiet period after the most recent message before a batch flushes,
    /// in seconds
    #[serde(default = "default_debounce_window_s")]
    pub debounce_window_s: f64,
    /// Flush immediately once a batch reaches this many entries
    /// (0 = unlimited)
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Refresh interval for the typing indicator while a batch is being
    /// processed, in seconds
    #[serde(default = "default_typing_interval_s")]
    pub typing_interval_s: u64,
}

fn default_debounce_window_s() -> f64 {
    2.0
}

fn default_max_batch_size() -> usize {
    5
}

fn default_typing_interval_s() -> u64 {
    4
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            debounce_window_s: default_debounce_window_s(),
            max_batch_size: default_max_batch_size(),
            typing_interval_s: default_typing_interval_s(),
        }
    }
}

/// Usage limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Daily token budget per sender (0 = unlimited)
    #[serde(default = "default_daily_token_limit")]
    pub daily_token_limit: u64,
}

fn default_daily_token_limit() -> u64 {
    100_000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            daily_token_limit: default_daily_token_limit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
