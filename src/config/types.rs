//! Settings structures shared by both server binaries.

use serde::Deserialize;

/// Complete runtime settings for one server process.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub performance: PerformanceSettings,
}

/// Listener endpoint and runtime sizing.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; `None` lets the runtime pick.
    pub workers: Option<usize>,
}

/// Log output targets and per-request logging.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Emit one line per handled request. Off by default; these servers
    /// sit in build loops where per-request noise drowns everything else.
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a custom `$variable` pattern.
    pub access_log_format: String,
    #[serde(default)]
    pub access_log_file: Option<String>,
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Connection handling limits, all timeouts in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceSettings {
    /// Zero disables HTTP keep-alive.
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    /// Admission cap on concurrent connections; `None` means unlimited.
    pub max_connections: Option<u64>,
}
