//! Transaction types and structural validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A transfer amount: any JSON number, integer or fractional.
///
/// Integers stay integers on the wire, so `5` is hashed as `5` and not `5.0`.
pub type Amount = serde_json::Number;

/// Sender used for transactions issued by the network itself (mining rewards).
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the node identity for every mined block.
pub const MINING_REWARD: i64 = 1;

/// Errors that can occur while building a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A value transfer recorded on the ledger.
///
/// No balance or signature checks exist; any amount, negative or
/// fractional, is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sending account.
    pub sender: String,
    /// Receiving account.
    pub recipient: String,
    /// Value to transfer.
    pub amount: Amount,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Amount>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Create the reward transaction paid to a miner.
    pub fn reward(recipient: impl Into<String>) -> Self {
        Self::new(REWARD_SENDER, recipient, MINING_REWARD)
    }

    /// Check if this transaction was issued by the network.
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}

/// An inbound transaction record whose fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Amount>,
}

/// Fields are checked in the order `sender`, `recipient`, `amount` and the
/// first missing one is reported.
impl TryFrom<TransactionRequest> for Transaction {
    type Error = TransactionError;

    fn try_from(request: TransactionRequest) -> Result<Self, Self::Error> {
        let sender = request
            .sender
            .ok_or(TransactionError::MissingField("sender"))?;
        let recipient = request
            .recipient
            .ok_or(TransactionError::MissingField("recipient"))?;
        let amount = request
            .amount
            .ok_or(TransactionError::MissingField("amount"))?;

        Ok(Transaction {
            sender,
            recipient,
            amount,
        })
    }
}
