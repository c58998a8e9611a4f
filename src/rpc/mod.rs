//! Ethereum JSON-RPC integration module
//!
//! This module provides everything the tracker needs from the upstream node:
//! - **Envelope** - JSON-RPC 2.0 request/response value objects and hex quantity decoding
//! - **Client** - HTTPS client that asks the node for its latest block number
//!
//! The poller only depends on the [`BlockHeightSource`] trait, so tests can
//! drive it with scripted heights instead of a live node.

pub mod client;
pub mod envelope;

// Re-export main types
pub use client::{BlockHeightSource, EthRpcClient};
pub use envelope::{parse_hex_quantity, RpcErrorObject, RpcRequest, RpcResponse, JSONRPC_VERSION};
