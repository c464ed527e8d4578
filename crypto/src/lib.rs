//! Hashing primitives for the PriceVote oracle.
//!
//! - **Blake2b-256** for every digest in the protocol
//! - **Vote commitments**: `Blake2b-256("{salt}:{tuples}:{voter}")`, computed
//!   by feeders before a prevote and recomputed by the oracle at reveal time

pub mod commitment;
pub mod hash;

pub use commitment::{derive_salt, verify_vote_hash, vote_hash, MAX_SALT_LEN};
pub use hash::{blake2b_256, blake2b_256_multi};
