//! HTTP node for tinyledger.
//!
//! Exposes the ledger over three endpoints:
//! - `GET /mine` searches a proof, pays the node its reward and seals a block
//! - `POST /transactions/new` queues a transaction for the next block
//! - `GET /chain` returns every sealed block
//!
//! plus `GET /health` for liveness checks.

pub mod api;
pub mod config;
pub mod logging;

pub use api::{build_router, ApiError, AppState};
pub use config::{generate_node_id, NodeConfig};
pub use logging::{init_logging, LogFormat};
