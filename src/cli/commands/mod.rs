use crate::config::AppConfig;
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;

pub mod block_number;
pub mod serve;

/// Config file and upstream node options shared by every command
#[derive(Args, Debug, Clone)]
pub struct RpcArgs {
    /// Path to a TOML config file (default: ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint URL (overrides config)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Total request timeout in seconds (overrides config)
    #[arg(long)]
    pub rpc_timeout_seconds: Option<u64>,
}

impl RpcArgs {
    /// Load file/env configuration, then apply command-line overrides
    pub fn load_config(&self) -> AppResult<AppConfig> {
        let mut config = AppConfig::load_from(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.rpc_url {
            config.rpc.url = url.clone();
        }
        if let Some(timeout) = self.rpc_timeout_seconds {
            config.rpc.timeout_seconds = timeout;
        }
    }
}
