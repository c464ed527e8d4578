//! LMDB storage backend for the PriceVote oracle.
//!
//! Implements every storage trait from `pricevote-store` using the `heed` LMDB
//! bindings. Each table maps to one named database inside a single
//! environment. Keys are the canonical string form of the address or pair, so
//! LMDB's byte order matches the in-memory ordering of those types. Values are
//! `bincode`-encoded records.

pub mod delegation;
pub mod environment;
pub mod error;
pub mod exchange_rate;
pub mod miss_counter;
pub mod prevote;
pub mod vote;
pub mod whitelist;

pub use environment::{LmdbEnvironment, LmdbOracleStore};
pub use error::LmdbError;
