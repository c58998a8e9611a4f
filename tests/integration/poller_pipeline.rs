//! Poller driven against a mock Ethereum node

use crate::common::mock_node::{mock_block_number, mock_raw};
use crate::common::rpc_client;
use anyhow::Result;
use chain_tip_tracker::poller::{PollOutcome, PollStats, Poller};
use chain_tip_tracker::rpc::EthRpcClient;
use chain_tip_tracker::store::ChainStateStore;
use mockito::Server;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type Harness = (Arc<ChainStateStore>, Arc<PollStats>, Poller<EthRpcClient>);

fn poller_for(url: &str) -> Harness {
    let store = Arc::new(ChainStateStore::new());
    let stats = Arc::new(PollStats::new());
    let poller = Poller::new(Arc::clone(&store), rpc_client(url), Duration::from_secs(10))
        .with_observer(stats.clone());
    (store, stats, poller)
}

#[tokio::test]
async fn test_observed_heights_follow_node() -> Result<()> {
    let mut server = Server::new_async().await;
    let (store, stats, mut poller) = poller_for(&server.url());
    let mut observed = Vec::new();

    let first = mock_block_number(&mut server, "0x10").await;
    poller.poll_once().await;
    observed.push(store.current_block());
    poller.poll_once().await;
    observed.push(store.current_block());
    first.remove_async().await;

    let _second = mock_block_number(&mut server, "0x15").await;
    poller.poll_once().await;
    observed.push(store.current_block());

    assert_eq!(observed, vec![16, 16, 21]);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.polls, 3);
    assert_eq!(snapshot.advances, 2);
    assert_eq!(snapshot.failures, 0);
    Ok(())
}

#[tokio::test]
async fn test_lagging_node_does_not_lower_height() -> Result<()> {
    let mut server = Server::new_async().await;
    let (store, _stats, mut poller) = poller_for(&server.url());

    let ahead = mock_block_number(&mut server, "0x20").await;
    poller.poll_once().await;
    ahead.remove_async().await;

    let _behind = mock_block_number(&mut server, "0x1f").await;
    assert!(matches!(
        poller.poll_once().await,
        PollOutcome::Unchanged {
            current: 32,
            fetched: 31
        }
    ));
    assert_eq!(store.current_block(), 32);
    Ok(())
}

#[tokio::test]
async fn test_malformed_result_keeps_height_and_poller_alive() -> Result<()> {
    let mut server = Server::new_async().await;
    let (store, stats, mut poller) = poller_for(&server.url());

    let good = mock_block_number(&mut server, "0x10").await;
    poller.poll_once().await;
    good.remove_async().await;

    let bad = mock_block_number(&mut server, "not-hex").await;
    for _ in 0..3 {
        assert!(matches!(poller.poll_once().await, PollOutcome::Failed(_)));
        assert_eq!(store.current_block(), 16);
    }
    bad.remove_async().await;

    let _recovered = mock_block_number(&mut server, "0x11").await;
    poller.poll_once().await;
    assert_eq!(store.current_block(), 17);
    assert_eq!(stats.snapshot().failures, 3);
    Ok(())
}

#[tokio::test]
async fn test_outage_keeps_last_known_height() -> Result<()> {
    let mut server = Server::new_async().await;
    let (store, stats, mut poller) = poller_for(&server.url());

    let good = mock_block_number(&mut server, "0x64").await;
    poller.poll_once().await;
    good.remove_async().await;

    let _down = mock_raw(&mut server, 500, "{}").await;
    for _ in 0..5 {
        poller.poll_once().await;
    }

    assert_eq!(store.current_block(), 100);
    assert_eq!(stats.snapshot().failures, 5);
    Ok(())
}

#[tokio::test]
async fn test_spawned_poller_updates_and_stops() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = mock_block_number(&mut server, "0x2a").await;

    let store = Arc::new(ChainStateStore::new());
    let poller = Poller::new(
        Arc::clone(&store),
        rpc_client(&server.url()),
        Duration::from_millis(50),
    );
    let shutdown = CancellationToken::new();
    let handle = poller.spawn(shutdown.clone());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while store.current_block() != 42 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.current_block(), 42);

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle).await??;
    Ok(())
}
