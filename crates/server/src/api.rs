//! HTTP endpoints for mining, submitting transactions and reading the chain.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tinyledger_chain::{LedgerError, MineError, Miner};
use tinyledger_core::{Block, Transaction, TransactionError, TransactionRequest};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub miner: Miner,
}

impl AppState {
    pub fn new(miner: Miner) -> Self {
        Self { miner }
    }
}

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing values: {0}")]
    MissingValues(&'static str),

    #[error("invalid request body: {0}")]
    InvalidInput(String),

    #[error("mining aborted")]
    MiningAborted,

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingValues(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::MiningAborted => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Transaction(TransactionError::MissingField(field)) => {
                ApiError::MissingValues(field)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<MineError> for ApiError {
    fn from(err: MineError) -> Self {
        match err {
            MineError::Aborted { .. } => ApiError::MiningAborted,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

/// Response for a freshly mined block.
#[derive(Debug, Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "New Block Forged".to_string(),
            index: block.index(),
            proof: block.proof(),
            previous_hash: block.previous_hash().to_string(),
            transactions: block.transactions().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Debug, Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub node_id: String,
    pub length: usize,
    pub pending_transactions: usize,
}

/// Build the node's router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/mine", get(mine))
        .route("/transactions/new", post(new_transaction))
        .route("/chain", get(full_chain))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn mine(State(state): State<AppState>) -> Result<Json<MineResponse>, ApiError> {
    let miner = state.miner.clone();
    let block = tokio::task::spawn_blocking(move || miner.mine())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(MineResponse::from(block)))
}

async fn new_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let Json(request) = payload?;
    let index = state.miner.ledger().lock().submit(request)?;

    info!(index, "transaction accepted");
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            message: format!("Transaction will be added to Block {index}"),
            index,
        }),
    ))
}

async fn full_chain(State(state): State<AppState>) -> Json<ChainResponse> {
    let chain = state.miner.ledger().lock().chain().to_vec();
    let length = chain.len();
    Json(ChainResponse { chain, length })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.miner.ledger().lock().stats();
    Json(HealthResponse {
        status: "ok",
        node_id: state.miner.node_id().to_string(),
        length: stats.length,
        pending_transactions: stats.pending_transactions,
    })
}
