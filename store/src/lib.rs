//! Abstract storage traits for the PriceVote oracle.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The oracle depends only on the traits. None of the keys encode a
//! voting period: per-period tables are cleared rather than accumulated.

pub mod delegation;
pub mod error;
pub mod exchange_rate;
pub mod miss_counter;
pub mod prevote;
pub mod stake;
pub mod vote;
pub mod whitelist;

pub use delegation::FeederDelegationStore;
pub use error::StoreError;
pub use exchange_rate::ExchangeRateStore;
pub use miss_counter::MissCounterStore;
pub use prevote::PrevoteStore;
pub use stake::ValidatorSet;
pub use vote::VoteStore;
pub use whitelist::PairWhitelistStore;

/// Every table the oracle persists.
pub trait OracleStore:
    PrevoteStore
    + VoteStore
    + MissCounterStore
    + ExchangeRateStore
    + FeederDelegationStore
    + PairWhitelistStore
{
}

impl<T> OracleStore for T where
    T: PrevoteStore
        + VoteStore
        + MissCounterStore
        + ExchangeRateStore
        + FeederDelegationStore
        + PairWhitelistStore
{
}
