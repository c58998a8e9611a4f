//! HTTP surface served on a real socket

use crate::common::mock_node::mock_block_number;
use crate::common::rpc_client;
use anyhow::Result;
use chain_tip_tracker::poller::Poller;
use chain_tip_tracker::server;
use chain_tip_tracker::store::ChainStateStore;
use chain_tip_tracker::types::Transaction;
use futures::future::join_all;
use mockito::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<chain_tip_tracker::errors::AppResult<()>>,
}

impl TestServer {
    async fn start(store: Arc<ChainStateStore>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server::serve(listener, store, shutdown.clone()));
        Ok(Self {
            addr,
            shutdown,
            handle,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(self) -> Result<()> {
        self.shutdown.cancel();
        self.handle.await??;
        Ok(())
    }
}

#[tokio::test]
async fn test_routes_over_http() -> Result<()> {
    let store = Arc::new(ChainStateStore::new());
    store.record_transaction(
        "0xabc",
        Transaction::new("0xabc", "0xdef", "0xde0b6b3a7640000", "0xfeed"),
    );
    let server = TestServer::start(Arc::clone(&store)).await?;
    let http = reqwest::Client::new();

    let response = http.get(server.url("/subscribe?address=0xabc")).send().await?;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "Address Successfully subscribed: 0xabc");

    let response = http.get(server.url("/subscribe")).send().await?;
    assert_eq!(response.status(), 400);

    let response = http.get(server.url("/current_block")).send().await?;
    assert_eq!(response.text().await?, "0");

    let response = http
        .get(server.url("/transactions?address=0xabc"))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body,
        serde_json::json!([{
            "from": "0xabc",
            "to": "0xdef",
            "value": "0xde0b6b3a7640000",
            "hash": "0xfeed"
        }])
    );

    drop(http);
    server.stop().await
}

#[tokio::test]
async fn test_parallel_subscribe_requests_register_once() -> Result<()> {
    let store = Arc::new(ChainStateStore::new());
    let server = TestServer::start(Arc::clone(&store)).await?;
    let http = reqwest::Client::new();
    let url = server.url("/subscribe?address=0xabc");

    let bodies = join_all((0..20).map(|_| {
        let http = http.clone();
        let url = url.clone();
        async move { http.get(url).send().await?.text().await }
    }))
    .await;

    let confirmations = bodies
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|body| body.starts_with("Address Successfully subscribed"))
        .count();
    assert_eq!(confirmations, 1);
    assert_eq!(store.subscribers(), vec!["0xabc"]);

    drop(http);
    server.stop().await
}

#[tokio::test]
async fn test_current_block_reflects_poller() -> Result<()> {
    let mut node = Server::new_async().await;
    let _mock = mock_block_number(&mut node, "0x10").await;

    let store = Arc::new(ChainStateStore::new());
    let shutdown = CancellationToken::new();
    let poller = Poller::new(
        Arc::clone(&store),
        rpc_client(&node.url()),
        Duration::from_millis(50),
    );
    let poller_handle = poller.spawn(shutdown.clone());
    let server = TestServer::start(Arc::clone(&store)).await?;
    let http = reqwest::Client::new();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    let mut body = String::new();
    while tokio::time::Instant::now() < deadline {
        body = http.get(server.url("/current_block")).send().await?.text().await?;
        if body == "16" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(body, "16");

    shutdown.cancel();
    poller_handle.await?;
    drop(http);
    server.stop().await
}
