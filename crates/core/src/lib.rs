//! Core ledger primitives for tinyledger.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - SHA-256 hashing helpers
//! - Transactions and inbound transaction requests
//! - Blocks and their canonical serialization

pub mod block;
pub mod hash;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::{block_hash, Block, BlockError, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use hash::{sha256, sha256_concat, sha256_hex, Hash, H256};
pub use transaction::{
    Amount, Transaction, TransactionError, TransactionRequest, MINING_REWARD, REWARD_SENDER,
};
