//! Proof of Work puzzle.
//!
//! A proof `p'` is valid against the previous proof `p` when the SHA-256 of
//! the decimal string `"{p}{p'}"` starts with [`DIFFICULTY`] zero hex digits.
//! Finding one takes ~16^DIFFICULTY attempts on average; checking one takes a
//! single hash.

use std::sync::atomic::{AtomicBool, Ordering};
use tinyledger_core::sha256_concat;
use tracing::debug;

/// Required number of leading `'0'` hex characters in a valid digest.
pub const DIFFICULTY: usize = 4;

/// Result of a cancellable search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A proof satisfying [`valid_proof`].
    Found(u64),
    /// The cancel flag was raised before a proof was found.
    Aborted {
        /// Number of candidates evaluated before stopping.
        attempts: u64,
    },
}

impl SearchOutcome {
    /// Get the proof, if one was found.
    pub fn proof(self) -> Option<u64> {
        match self {
            SearchOutcome::Found(proof) => Some(proof),
            SearchOutcome::Aborted { .. } => None,
        }
    }
}

/// Check whether `candidate` solves the puzzle posed by `previous_proof`.
pub fn valid_proof(previous_proof: u64, candidate: u64) -> bool {
    let digest = sha256_concat(&[
        previous_proof.to_string().as_bytes(),
        candidate.to_string().as_bytes(),
    ]);
    has_leading_zero_nibbles(digest.as_bytes(), DIFFICULTY)
}

/// Find the smallest proof valid against `previous_proof`.
///
/// Blocks the calling thread until a proof is found. There is no upper bound
/// on the number of attempts.
pub fn search(previous_proof: u64) -> u64 {
    let mut candidate = 0u64;
    while !valid_proof(previous_proof, candidate) {
        candidate += 1;
    }
    candidate
}

/// Like [`search`], but checks `cancel` before every candidate.
pub fn search_until(previous_proof: u64, cancel: &AtomicBool) -> SearchOutcome {
    let mut candidate = 0u64;
    loop {
        if cancel.load(Ordering::Relaxed) {
            debug!(previous_proof, attempts = candidate, "proof search aborted");
            return SearchOutcome::Aborted {
                attempts: candidate,
            };
        }
        if valid_proof(previous_proof, candidate) {
            debug!(previous_proof, proof = candidate, "proof found");
            return SearchOutcome::Found(candidate);
        }
        candidate += 1;
    }
}

/// Equivalent to `hex(digest).starts_with("0".repeat(nibbles))`.
fn has_leading_zero_nibbles(digest: &[u8], nibbles: usize) -> bool {
    let full_bytes = nibbles / 2;
    if digest.len() < full_bytes + nibbles % 2 {
        return false;
    }
    if digest[..full_bytes].iter().any(|b| *b != 0) {
        return false;
    }
    nibbles % 2 == 0 || digest[full_bytes] >> 4 == 0
}
