//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the oracle (block height, storage, the
//! staking module's validator set) are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod stake;
pub mod store;

pub use clock::NullBlockClock;
pub use stake::NullValidatorSet;
pub use store::NullOracleStore;
