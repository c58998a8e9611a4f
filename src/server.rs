//! HTTP query surface over the chain state store
//!
//! | Route            | Query     | Response                          |
//! |------------------|-----------|-----------------------------------|
//! | `/subscribe`     | `address` | confirmation text                 |
//! | `/current_block` |           | height as decimal text            |
//! | `/transactions`  | `address` | JSON array of recorded transfers  |
//!
//! A missing or empty `address` is answered with 400.

use crate::errors::AppResult;
use crate::store::ChainStateStore;
use crate::types::Transaction;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

type SharedStore = Arc<ChainStateStore>;
type Rejection = (StatusCode, &'static str);

/// First `address` value; repeats are ignored and an empty first value is rejected
fn require_address(
    params: Vec<(String, String)>,
    message: &'static str,
) -> Result<String, Rejection> {
    params
        .into_iter()
        .find(|(key, _)| key == "address")
        .map(|(_, value)| value)
        .filter(|address| !address.is_empty())
        .ok_or((StatusCode::BAD_REQUEST, message))
}

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/subscribe", get(subscribe))
        .route("/current_block", get(current_block))
        .route("/transactions", get(transactions))
        .with_state(store)
}

async fn subscribe(
    State(store): State<SharedStore>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<String, Rejection> {
    let address = require_address(params, "Address is required")?;
    if store.subscribe(&address) {
        Ok(format!("Address Successfully subscribed: {}", address))
    } else {
        Ok("Address is already subscribed!".to_string())
    }
}

async fn current_block(State(store): State<SharedStore>) -> String {
    store.current_block().to_string()
}

async fn transactions(
    State(store): State<SharedStore>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Transaction>>, Rejection> {
    let address = require_address(params, "Address parameter is missing")?;
    let records = store.transactions(&address);
    debug!("Serving {} transactions for {}", records.len(), address);
    Ok(Json(records))
}

/// Serve the query routes on `listener` until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    store: SharedStore,
    shutdown: CancellationToken,
) -> AppResult<()> {
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
