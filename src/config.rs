use crate::errors::{AppError, AppResult};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Public Ethereum mainnet endpoint used when nothing else is configured
pub const DEFAULT_RPC_URL: &str = "https://ethereum-rpc.publicnode.com";

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub rpc: EthRpcConfig,
    pub poller: PollerConfig,
    pub server: ServerConfig,
}

/// Upstream JSON-RPC node settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthRpcConfig {
    pub url: String,
    /// Total deadline for one request (connect + write + read)
    pub timeout_seconds: u64,
    pub request_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for EthRpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            timeout_seconds: 10,
            request_id: 1,
        }
    }
}

impl EthRpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 10,
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from ./config.toml (if present) and environment variables
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required when given) or
    /// the optional ./config.toml, then apply `TRACKER_*` environment overrides.
    ///
    /// Environment variables take precedence over file configuration, e.g.
    /// `TRACKER_RPC__URL` or `TRACKER_POLLER__INTERVAL_SECONDS`.
    pub fn load_from(path: Option<&Path>) -> AppResult<Self> {
        let config = Self::builder(path)?.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn builder(
        path: Option<&Path>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = AppConfig::default();
        let builder = Config::builder()
            .set_default("rpc.url", defaults.rpc.url)?
            .set_default("rpc.timeout_seconds", defaults.rpc.timeout_seconds)?
            .set_default("rpc.request_id", defaults.rpc.request_id)?
            .set_default("poller.interval_seconds", defaults.poller.interval_seconds)?
            .set_default("server.bind_address", defaults.server.bind_address)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        Ok(builder.add_source(
            Environment::with_prefix("TRACKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        ))
    }

    /// Reject settings the poller or server cannot run with
    pub fn validate(&self) -> AppResult<()> {
        let url = self.rpc.url.trim();
        if url.is_empty() {
            return Err(AppError::Config("rpc.url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "rpc.url must be an http(s) URL, got {}",
                url
            )));
        }
        if self.rpc.timeout_seconds == 0 {
            return Err(AppError::Config(
                "rpc.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.poller.interval_seconds == 0 {
            return Err(AppError::Config(
                "poller.interval_seconds must be greater than zero".to_string(),
            ));
        }
        self.bind_address()?;
        Ok(())
    }

    pub fn bind_address(&self) -> AppResult<SocketAddr> {
        self.server.bind_address.parse().map_err(|e| {
            AppError::Config(format!(
                "Invalid server.bind_address {}: {}",
                self.server.bind_address, e
            ))
        })
    }
}
