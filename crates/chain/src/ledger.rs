//! The ledger: sealed blocks plus the pending pool.
//!
//! Sealing trusts its caller. Proof-of-work must be checked (or produced by
//! [`tinyledger_consensus::search`]) before [`Ledger::seal_block`] is called;
//! [`Ledger::verify`] re-checks the whole chain after the fact.

use crate::pool::PendingPool;
use serde::Serialize;
use thiserror::Error;
use tinyledger_consensus::{BlockValidator, ValidationError};
use tinyledger_core::{
    Amount, Block, Transaction, TransactionError, TransactionRequest, GENESIS_PREVIOUS_HASH,
    GENESIS_PROOF,
};
use tracing::debug;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("chain has no blocks")]
    EmptyChain,

    #[error("invalid transaction: {0}")]
    Transaction(#[from] TransactionError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Append-only chain of blocks and the transactions waiting for the next one.
#[derive(Debug)]
pub struct Ledger {
    /// Sealed blocks; `chain[i].index() == i + 1`.
    chain: Vec<Block>,
    /// Transactions for the next block.
    pending: PendingPool,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: PendingPool::new(),
        };
        ledger.seal_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        ledger
    }

    /// All sealed blocks, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Number of sealed blocks.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Check if the chain has no blocks.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Transactions waiting for the next block, in arrival order.
    pub fn pending(&self) -> &[Transaction] {
        self.pending.transactions()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Get the most recently sealed block.
    pub fn try_last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Get the most recently sealed block.
    pub fn last_block(&self) -> &Block {
        self.chain.last().expect("ledger always holds the genesis block")
    }

    /// Queue a transaction for the next block.
    ///
    /// Returns the index of the block that will contain it.
    pub fn submit_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Amount>,
    ) -> u64 {
        self.push_pending(Transaction::new(sender, recipient, amount))
    }

    /// Queue an inbound request after checking that every field is present.
    ///
    /// A rejected request leaves the pool untouched.
    pub fn submit(&mut self, request: TransactionRequest) -> Result<u64> {
        let tx = Transaction::try_from(request)?;
        Ok(self.push_pending(tx))
    }

    fn push_pending(&mut self, tx: Transaction) -> u64 {
        debug!(
            sender = %tx.sender,
            recipient = %tx.recipient,
            amount = %tx.amount,
            "transaction queued"
        );
        self.pending.push(tx);
        self.last_block().index() + 1
    }

    /// Seal every pending transaction into a new block.
    ///
    /// `previous_hash` defaults to the hash of the current last block. The
    /// proof is recorded as given.
    pub fn seal_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = previous_hash.unwrap_or_else(|| {
            self.chain
                .last()
                .map(Block::hash)
                .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string())
        });
        let index = self.chain.len() as u64 + 1;
        let block = Block::new(index, self.pending.drain(), proof, previous_hash);

        debug!(
            index,
            proof,
            transactions = block.tx_count(),
            "block sealed"
        );

        self.chain.push(block);
        self.last_block()
    }

    /// Re-check genesis, links and proofs of the whole chain.
    pub fn verify(&self) -> std::result::Result<(), ValidationError> {
        BlockValidator::validate_chain(&self.chain)
    }

    /// Get ledger statistics.
    pub fn stats(&self) -> LedgerStats {
        let last = self.last_block();
        LedgerStats {
            length: self.chain.len(),
            pending_transactions: self.pending.len(),
            last_index: last.index(),
            last_proof: last.proof(),
            last_hash: last.hash(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Ledger statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    /// Number of sealed blocks.
    pub length: usize,
    /// Number of pending transactions.
    pub pending_transactions: usize,
    /// Index of the last block.
    pub last_index: u64,
    /// Proof of the last block.
    pub last_proof: u64,
    /// Hash of the last block.
    pub last_hash: String,
}
