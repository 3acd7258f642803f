//! Proof of Work consensus for tinyledger.
//!
//! This crate provides the puzzle every sealed block must solve:
//! - Proof validation against the previous block's proof
//! - Linear proof search, blocking or cancellable
//! - Chain validation (index continuity, parent links, proofs)
//!
//! # Example
//!
//! ```rust
//! use tinyledger_consensus::{search, valid_proof};
//!
//! let proof = search(100);
//! assert!(valid_proof(100, proof));
//! ```

pub mod pow;
pub mod validator;

// Re-export commonly used items
pub use pow::{search, search_until, valid_proof, SearchOutcome, DIFFICULTY};
pub use validator::{BlockValidator, ValidationError};
