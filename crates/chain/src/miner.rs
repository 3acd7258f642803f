//! Block production on a shared ledger.
//!
//! The proof search runs without holding the ledger lock. Paying the reward
//! and sealing happen together under the lock, so a concurrent submit lands
//! either in the new block or in the pool of the next one, never in between.

use crate::ledger::Ledger;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tinyledger_consensus::{search_until, SearchOutcome};
use tinyledger_core::{Block, MINING_REWARD, REWARD_SENDER};
use tracing::{info, warn};

/// A ledger shared between request handlers.
pub type SharedLedger = Arc<Mutex<Ledger>>;

/// Errors that can occur while mining.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MineError {
    #[error("mining aborted after {attempts} attempts")]
    Aborted { attempts: u64 },
}

pub type Result<T> = std::result::Result<T, MineError>;

/// Mines blocks on a shared ledger on behalf of one node identity.
#[derive(Debug, Clone)]
pub struct Miner {
    ledger: SharedLedger,
    node_id: String,
    cancel: Arc<AtomicBool>,
}

impl Miner {
    /// Create a miner paying rewards to `node_id`.
    pub fn new(ledger: SharedLedger, node_id: impl Into<String>) -> Self {
        Self {
            ledger,
            node_id: node_id.into(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use an externally owned cancellation flag.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Recipient of mining rewards.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Abort every in-flight and future search of this miner.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Find a proof for the current tip, pay the reward and seal a block.
    ///
    /// If another block was sealed while searching, the found proof is stale
    /// and the search restarts from the new tip. Blocks the calling thread.
    pub fn mine(&self) -> Result<Block> {
        loop {
            let (tip_index, tip_proof) = {
                let ledger = self.ledger.lock();
                let tip = ledger.last_block();
                (tip.index(), tip.proof())
            };

            let proof = match search_until(tip_proof, &self.cancel) {
                SearchOutcome::Found(proof) => proof,
                SearchOutcome::Aborted { attempts } => {
                    warn!(tip_index, attempts, "mining aborted");
                    return Err(MineError::Aborted { attempts });
                }
            };

            let mut ledger = self.ledger.lock();
            let tip = ledger.last_block();
            if tip.index() != tip_index {
                warn!(
                    expected = tip_index,
                    actual = tip.index(),
                    "chain advanced during proof search, retrying"
                );
                continue;
            }

            let previous_hash = tip.hash();
            ledger.submit_transaction(REWARD_SENDER, self.node_id.as_str(), MINING_REWARD);
            let block = ledger.seal_block(proof, Some(previous_hash)).clone();

            info!(
                index = block.index(),
                proof,
                transactions = block.tx_count(),
                "new block forged"
            );
            return Ok(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tinyledger_core::Transaction;

    fn shared_ledger() -> SharedLedger {
        Arc::new(Mutex::new(Ledger::new()))
    }

    #[test]
    fn test_mine_block() {
        let ledger = shared_ledger();
        ledger.lock().submit_transaction("a", "b", 5);
        let genesis_hash = ledger.lock().last_block().hash();

        let miner = Miner::new(ledger.clone(), "node-1");
        let block = miner.mine().unwrap();

        assert_eq!(block.index(), 2);
        assert_eq!(block.proof(), 35293);
        assert_eq!(block.previous_hash(), genesis_hash);
        assert_eq!(
            block.transactions(),
            &[Transaction::new("a", "b", 5), Transaction::reward("node-1")]
        );

        let ledger = ledger.lock();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.pending_len(), 0);
        assert!(ledger.verify().is_ok());
    }

    #[test]
    fn test_mine_empty_pool_contains_only_reward() {
        let miner = Miner::new(shared_ledger(), "node-1");
        let block = miner.mine().unwrap();

        assert_eq!(block.transactions(), &[Transaction::reward("node-1")]);
    }

    #[test]
    fn test_cancelled_miner_aborts() {
        let ledger = shared_ledger();
        let miner = Miner::new(ledger.clone(), "node-1");
        miner.cancel();

        assert!(miner.is_cancelled());
        assert_eq!(miner.mine(), Err(MineError::Aborted { attempts: 0 }));
        assert_eq!(ledger.lock().len(), 1);
        assert_eq!(ledger.lock().pending_len(), 0);
    }

    #[test]
    fn test_shared_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let miner = Miner::new(shared_ledger(), "node-1").with_cancel(flag.clone());

        flag.store(true, Ordering::Relaxed);
        assert!(miner.is_cancelled());
    }

    #[test]
    fn test_concurrent_miners_keep_chain_valid() {
        let ledger = shared_ledger();
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let miner = Miner::new(ledger.clone(), format!("node-{i}"));
                thread::spawn(move || miner.mine().unwrap())
            })
            .collect();

        let mut indices: Vec<u64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().index())
            .collect();
        indices.sort_unstable();

        assert_eq!(indices, vec![2, 3]);
        let ledger = ledger.lock();
        assert_eq!(ledger.len(), 3);
        assert!(ledger.verify().is_ok());
    }

    #[test]
    fn test_concurrent_submissions_are_not_lost() {
        let ledger = shared_ledger();
        let miner = Miner::new(ledger.clone(), "node-1");

        let submitter = {
            let ledger = ledger.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    ledger.lock().submit_transaction("a", "b", i);
                }
            })
        };
        let mined = miner.mine().unwrap();
        submitter.join().unwrap();

        let ledger = ledger.lock();
        let user_txs_in_chain = ledger
            .chain()
            .iter()
            .flat_map(|b| b.transactions())
            .filter(|tx| !tx.is_reward())
            .count();
        assert_eq!(user_txs_in_chain + ledger.pending_len(), 200);
        assert_eq!(mined.index(), 2);
    }
}
