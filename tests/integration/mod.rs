//! Integration Tests Module
//!
//! End-to-end tests that drive the poller against a mock node and query
//! the running HTTP server.

pub mod http_server;
pub mod poller_pipeline;
