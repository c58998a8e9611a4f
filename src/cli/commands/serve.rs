use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::poller::{PollStats, Poller};
use crate::rpc::EthRpcClient;
use crate::server;
use crate::store::ChainStateStore;
use clap::Args;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::RpcArgs;

/// Run the poller and HTTP server until Ctrl-C
#[derive(Args)]
pub struct ServeCommand {
    #[command(flatten)]
    pub rpc: RpcArgs,

    /// Address for the HTTP server (overrides config)
    #[arg(long)]
    pub bind: Option<String>,

    /// Seconds between block height polls (overrides config)
    #[arg(long)]
    pub interval_seconds: Option<u64>,
}

impl ServeCommand {
    fn load_config(&self) -> AppResult<AppConfig> {
        let mut config = self.rpc.load_config()?;
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(interval) = self.interval_seconds {
            config.poller.interval_seconds = interval;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn run(&self) -> AppResult<()> {
        let config = self.load_config()?;
        info!(
            "Tracking {} every {}s",
            config.rpc.url, config.poller.interval_seconds
        );

        let store = Arc::new(ChainStateStore::new());
        let stats = Arc::new(PollStats::new());
        let shutdown = CancellationToken::new();

        let client = EthRpcClient::new(config.rpc.clone())?;
        let poller = Poller::new(Arc::clone(&store), client, config.poller.interval())
            .with_observer(stats.clone());
        let poller_handle = poller.spawn(shutdown.clone());

        let listener = TcpListener::bind(config.bind_address()?).await?;

        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("Shutdown requested"),
                    Err(e) => warn!("Failed to listen for Ctrl-C, shutting down: {}", e),
                }
                shutdown.cancel();
            }
        });

        let served = server::serve(listener, Arc::clone(&store), shutdown.clone()).await;
        shutdown.cancel();

        poller_handle
            .await
            .map_err(|e| AppError::Server(format!("Poller task failed: {}", e)))?;

        let snapshot = stats.snapshot();
        info!(
            "Final height {} after {} polls ({} advances, {} failures, {:.1}% failed)",
            store.current_block(),
            snapshot.polls,
            snapshot.advances,
            snapshot.failures,
            snapshot.failure_rate()
        );

        served
    }
}
