//! Block and chain validation rules.
//!
//! Sealing never checks its inputs; these rules let a holder of a chain
//! confirm after the fact that every link and every proof is sound.

use crate::pow::valid_proof;
use thiserror::Error;
use tinyledger_core::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("chain has no blocks")]
    EmptyChain,

    #[error("genesis block does not match the protocol genesis")]
    InvalidGenesis,

    #[error("block index mismatch (expected {expected}, got {got})")]
    InvalidIndex { expected: u64, got: u64 },

    #[error("block {index} previous_hash does not match its parent")]
    InvalidPreviousHash { index: u64 },

    #[error("block {index} proof does not solve its parent's puzzle")]
    InvalidProof { index: u64 },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Block validator.
pub struct BlockValidator;

impl BlockValidator {
    /// Validate the protocol genesis shape.
    pub fn validate_genesis(block: &Block) -> Result<()> {
        if block.index() != 1 {
            return Err(ValidationError::InvalidIndex {
                expected: 1,
                got: block.index(),
            });
        }
        if block.previous_hash() != GENESIS_PREVIOUS_HASH || block.proof() != GENESIS_PROOF {
            return Err(ValidationError::InvalidGenesis);
        }
        Ok(())
    }

    /// Validate block extends the parent correctly.
    pub fn validate_block_extends_parent(block: &Block, parent: &Block) -> Result<()> {
        // Check index
        if block.index() != parent.index() + 1 {
            return Err(ValidationError::InvalidIndex {
                expected: parent.index() + 1,
                got: block.index(),
            });
        }

        // Check previous_hash
        if block.previous_hash() != parent.hash() {
            return Err(ValidationError::InvalidPreviousHash {
                index: block.index(),
            });
        }

        // Check proof of work
        if !valid_proof(parent.proof(), block.proof()) {
            return Err(ValidationError::InvalidProof {
                index: block.index(),
            });
        }

        Ok(())
    }

    /// Validate a whole chain from genesis to tip.
    pub fn validate_chain(chain: &[Block]) -> Result<()> {
        let genesis = chain.first().ok_or(ValidationError::EmptyChain)?;
        Self::validate_genesis(genesis)?;

        for pair in chain.windows(2) {
            Self::validate_block_extends_parent(&pair[1], &pair[0])?;
        }

        Ok(())
    }
}
