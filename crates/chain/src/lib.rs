//! Ledger orchestration for tinyledger.
//!
//! This crate brings the primitives together into a working single-node ledger:
//! - **Ledger**: the sealed chain plus the pending transaction pool
//! - **Pool**: transactions waiting for the next block
//! - **Miner**: proof search, reward payment and sealing on a shared ledger
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use tinyledger_chain::{Ledger, Miner};
//!
//! let ledger = Arc::new(Mutex::new(Ledger::new()));
//! ledger.lock().submit_transaction("alice", "bob", 5);
//!
//! let miner = Miner::new(ledger.clone(), "node-1");
//! let block = miner.mine().unwrap();
//!
//! assert_eq!(block.index(), 2);
//! assert!(ledger.lock().verify().is_ok());
//! ```

pub mod ledger;
pub mod miner;
pub mod pool;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerError, LedgerStats};
pub use miner::{MineError, Miner, SharedLedger};
pub use pool::PendingPool;
pub use tinyledger_consensus::ValidationError;
