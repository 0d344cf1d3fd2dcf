// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Served directory and discovery settings
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory whose files are served
    pub root: PathBuf,
    /// Period between scan cycles
    pub scan_interval_ms: u64,
    /// Wake the scanner early on filesystem events
    pub watch: bool,
    /// Fixed URL -> file (relative to root) bindings, outside the scan cycle
    #[serde(default = "default_aliases")]
    pub aliases: HashMap<String, String>,
}

impl SiteConfig {
    pub const fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_aliases() -> HashMap<String, String> {
    HashMap::from([("/play".to_string(), "index.html".to_string())])
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (plain or common)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "plain".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a client gets to deliver request headers (0 = no limit)
    pub read_timeout: u64,
}
