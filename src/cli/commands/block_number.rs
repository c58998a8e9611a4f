use crate::errors::{AppError, AppResult};
use crate::rpc::EthRpcClient;
use clap::Args;
use tracing::{error, info};

use super::RpcArgs;

/// Fetch the latest block number once
#[derive(Args)]
pub struct BlockNumberCommand {
    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl BlockNumberCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = self.rpc.load_config()?;
        info!("Querying latest block from {}", config.rpc.url);

        let client = EthRpcClient::new(config.rpc)?;
        match client.block_number().await {
            Ok(height) => {
                println!("{}", height);
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch latest block from {}: {}", client.endpoint(), e);
                Err(AppError::Rpc(e))
            }
        }
    }
}
