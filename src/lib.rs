//! Ethereum chain-tip tracker
//!
//! Polls a JSON-RPC node for the latest block number and keeps a
//! thread-safe registry of subscribed addresses and their recorded
//! transactions, exposed over a small HTTP query surface.

pub mod cli;
pub mod config;
pub mod errors;
pub mod poller;
pub mod rpc;
pub mod server;
pub mod store;
pub mod types;
