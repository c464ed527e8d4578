//! Fundamental types for the PriceVote oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, asset pairs, commitment hashes, exchange-rate tuples, commit/reveal
//! records, published rates, and the governable oracle parameters.

pub mod address;
pub mod error;
pub mod hash;
pub mod pair;
pub mod params;
pub mod rate;
pub mod vote;

pub use address::{AccountAddress, ValidatorAddress};
pub use error::TypesError;
pub use hash::VoteHash;
pub use pair::AssetPair;
pub use params::{OracleParams, BPS_DENOMINATOR};
pub use rate::{ExchangeRateTuple, ExchangeRateTuples};
pub use vote::{AggregatedExchangeRate, Prevote, Vote};

pub use rust_decimal::Decimal;
