//! Pending transaction pool.
//!
//! The pool holds submitted transactions, in arrival order, until the next
//! block is sealed. Nothing is validated or deduplicated here.

use tinyledger_core::Transaction;

/// Transactions waiting for the next block.
#[derive(Debug, Default)]
pub struct PendingPool {
    transactions: Vec<Transaction>,
}

impl PendingPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of transactions in the pool.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Append a transaction after all those already pooled.
    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Pooled transactions in arrival order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Take every pooled transaction, leaving the pool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }
}
