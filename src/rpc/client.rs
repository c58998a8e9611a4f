use crate::config::EthRpcConfig;
use crate::errors::{RpcError, RpcResult};
use crate::rpc::envelope::{parse_hex_quantity, RpcRequest, RpcResponse, METHOD_BLOCK_NUMBER};
use std::future::Future;
use tracing::debug;

/// Anything that can report the chain's latest block height.
///
/// Implemented by [`EthRpcClient`] for real nodes; the poller is generic over
/// it so tests can script heights and failures.
pub trait BlockHeightSource: Send + Sync {
    fn fetch_latest_block_height(&self) -> impl Future<Output = RpcResult<u64>> + Send;
}

/// JSON-RPC client for a single Ethereum node endpoint
#[derive(Debug, Clone)]
pub struct EthRpcClient {
    http: reqwest::Client,
    config: EthRpcConfig,
}

impl EthRpcClient {
    /// Build the HTTP client once; the configured timeout covers the whole request
    pub fn new(config: EthRpcConfig) -> RpcResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                RpcError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.url
    }

    /// Send one request and decode the envelope, without interpreting `result`
    pub async fn call(&self, request: &RpcRequest) -> RpcResult<RpcResponse> {
        debug!(
            "Sending {} (id {}) to {}",
            request.method, request.id, self.config.url
        );

        let response = self
            .http
            .post(&self.config.url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(&request.method, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| self.transport_error(&request.method, e))?;

        response
            .json::<RpcResponse>()
            .await
            .map_err(|e| self.transport_error(&request.method, e))
    }

    /// Query `eth_blockNumber` and decode the hex result
    pub async fn block_number(&self) -> RpcResult<u64> {
        let request = RpcRequest::block_number(self.config.request_id);
        let result = self
            .call(&request)
            .await?
            .into_string_result(METHOD_BLOCK_NUMBER)?;

        let height = parse_hex_quantity(&result)?;
        debug!("{} returned {} ({})", METHOD_BLOCK_NUMBER, height, result);
        Ok(height)
    }

    fn transport_error(&self, method: &str, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            RpcError::Timeout {
                timeout_seconds: self.config.timeout_seconds,
                operation: method.to_string(),
            }
        } else {
            RpcError::from(err)
        }
    }
}

impl BlockHeightSource for EthRpcClient {
    async fn fetch_latest_block_height(&self) -> RpcResult<u64> {
        self.block_number().await
    }
}
