//! Block structure and canonical hashing.
//!
//! A block's hash is the SHA-256 of its canonical JSON form. The canonical
//! form is produced by going through [`serde_json::Value`] and sorting every
//! object's keys, so the digest never depends on field declaration order or
//! on how the block was built.

use crate::hash::sha256;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Proof value every chain starts from.
pub const GENESIS_PROOF: u64 = 100;

/// Placeholder `previous_hash` of the genesis block. Never a valid hex digest.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Errors that can occur while serializing a block.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("canonical serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A sealed batch of transactions linked to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: f64,
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

impl Block {
    /// Create a block stamped with the current wall-clock time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(
            index,
            Self::current_timestamp(),
            transactions,
            proof,
            previous_hash,
        )
    }

    /// Create a block with an explicit timestamp.
    pub fn with_timestamp(
        index: u64,
        timestamp: f64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash: previous_hash.into(),
        }
    }

    /// Create the genesis block.
    pub fn genesis() -> Self {
        Self::new(1, Vec::new(), GENESIS_PROOF, GENESIS_PREVIOUS_HASH)
    }

    /// Seconds since the Unix epoch, with sub-second precision.
    pub fn current_timestamp() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default()
    }

    /// 1-based position in the chain.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn proof(&self) -> u64 {
        self.proof
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Get the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Serialize to canonical JSON: keys sorted at every level, no whitespace.
    pub fn canonical_json(&self) -> Result<Vec<u8>, BlockError> {
        let value = canonicalize(serde_json::to_value(self)?);
        Ok(serde_json::to_vec(&value)?)
    }

    /// Get the canonical block hash as lowercase hex.
    pub fn hash(&self) -> String {
        block_hash(self)
    }
}

/// Canonical SHA-256 hash of a block, hex encoded. Usable without a ledger.
pub fn block_hash(block: &Block) -> String {
    // Every field maps onto a JSON value; a non-finite timestamp becomes `null`.
    let encoded = block
        .canonical_json()
        .expect("serialization should not fail");
    sha256(&encoded).to_hex()
}

/// Rebuild every object with its keys in lexicographic order.
///
/// `serde_json::Map` is already sorted unless the `preserve_order` feature is
/// enabled somewhere in the build; rebuilding keeps the output stable either way.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_block() -> Block {
        Block::with_timestamp(
            2,
            1_700_000_000.5,
            vec![Transaction::new("a", "b", 5)],
            35293,
            "ab".repeat(32),
        )
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis();

        assert!(genesis.is_genesis());
        assert_eq!(genesis.index(), 1);
        assert_eq!(genesis.proof(), GENESIS_PROOF);
        assert_eq!(genesis.previous_hash(), GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions().is_empty());
        assert!(genesis.timestamp() > 0.0);
    }

    #[test]
    fn test_genesis_sentinel_is_not_a_hash() {
        assert!(crate::hash::Hash::from_hex(GENESIS_PREVIOUS_HASH).is_err());
    }

    #[test]
    fn test_block_hash_deterministic() {
        let block = sample_block();

        assert_eq!(block.hash(), block.hash());
        assert_eq!(block.hash(), block_hash(&block.clone()));
        assert_eq!(block.hash().len(), 64);
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let encoded = String::from_utf8(sample_block().canonical_json().unwrap()).unwrap();

        assert_eq!(
            encoded,
            concat!(
                r#"{"index":2,"previous_hash":"#,
                r#""abababababababababababababababababababababababababababababababab","#,
                r#""proof":35293,"timestamp":1700000000.5,"#,
                r#""transactions":[{"amount":5,"recipient":"b","sender":"a"}]}"#
            )
        );
    }

    #[test]
    fn test_canonical_json_keeps_fractional_amounts() {
        let tx = Transaction::new("a", "b", crate::Amount::from_f64(0.5).unwrap());
        let block = Block::with_timestamp(2, 1.0, vec![tx], 1, "1");
        let encoded = String::from_utf8(block.canonical_json().unwrap()).unwrap();

        assert!(encoded.contains(r#"{"amount":0.5,"recipient":"b","sender":"a"}"#));
        assert_eq!(block.hash().len(), 64);
    }

    #[test]
    fn test_hash_independent_of_construction_path() {
        let built = sample_block();

        // Same fields, supplied in a different order through JSON.
        let parsed: Block = serde_json::from_value(json!({
            "transactions": [{"amount": 5, "sender": "a", "recipient": "b"}],
            "previous_hash": "ab".repeat(32),
            "proof": 35293,
            "timestamp": 1_700_000_000.5,
            "index": 2,
        }))
        .unwrap();

        assert_eq!(built, parsed);
        assert_eq!(built.hash(), parsed.hash());
    }

    #[test]
    fn test_hash_changes_with_content() {
        let block = sample_block();
        let other = Block::with_timestamp(
            2,
            block.timestamp(),
            vec![Transaction::new("a", "b", 6)],
            block.proof(),
            block.previous_hash(),
        );

        assert_ne!(block.hash(), other.hash());
    }

    #[test]
    fn test_block_with_transactions() {
        let txs = vec![Transaction::new("a", "b", 1), Transaction::new("c", "d", 2)];
        let block = Block::new(3, txs.clone(), 7, "ff".repeat(32));

        assert_eq!(block.tx_count(), 2);
        assert_eq!(block.transactions(), txs.as_slice());
        assert!(!block.is_genesis());
    }

    #[test]
    fn test_canonicalize_nested_objects() {
        let value = json!({"b": {"z": 1, "a": [{"y": 2, "x": 3}]}, "a": 0});
        let encoded = serde_json::to_string(&canonicalize(value)).unwrap();

        assert_eq!(encoded, r#"{"a":0,"b":{"a":[{"x":3,"y":2}],"z":1}}"#);
    }
}
