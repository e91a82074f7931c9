//! Settings loading.
//!
//! Defaults carry the fixed deployment values (port 8082 on all
//! interfaces); an optional TOML file next to the process and `SERVER_*`
//! environment variables can override them, file first, environment last.

mod types;

use std::net::SocketAddr;

pub use types::{LoggingSettings, PerformanceSettings, ServerSettings, Settings};

impl Settings {
    /// Load settings for one binary. `config_name` is the stem of an
    /// optional TOML file in the working directory ("dev-server" reads
    /// `dev-server.toml` when present).
    pub fn load_from(config_name: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_name).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    /// The listen address as a parsed socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}
