//! tinyledger node entry point.

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tinyledger_chain::{Ledger, Miner};
use tinyledger_server::{build_router, init_logging, AppState, NodeConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::parse();
    init_logging(config.log_format, &config.log_level).context("Failed to initialise logging")?;

    let node_id = config.resolve_node_id();
    let cancel = Arc::new(AtomicBool::new(false));
    let ledger = Arc::new(Mutex::new(Ledger::new()));
    let miner = Miner::new(ledger, node_id.clone()).with_cancel(cancel.clone());
    let app = build_router(AppState::new(miner));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, %node_id, "node listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown requested"),
                Err(e) => {
                    warn!(error = %e, "cannot listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
            // Stops searches still running on the blocking pool.
            cancel.store(true, Ordering::Relaxed);
        })
        .await
        .context("Server error")?;

    Ok(())
}
