//! Commit/reveal records and the published aggregate.

use crate::address::ValidatorAddress;
use crate::hash::VoteHash;
use crate::pair::AssetPair;
use crate::rate::ExchangeRateTuples;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A validator's commitment for one voting period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prevote {
    pub hash: VoteHash,
    pub voter: ValidatorAddress,
    /// Block height the commitment was accepted at.
    pub submit_block: u64,
}

impl Prevote {
    pub fn new(hash: VoteHash, voter: ValidatorAddress, submit_block: u64) -> Self {
        Self {
            hash,
            voter,
            submit_block,
        }
    }

    /// The voting period this commitment belongs to.
    pub fn period(&self, vote_period: u64) -> u64 {
        self.submit_block / vote_period
    }
}

/// A revealed set of exchange rates, accepted against the voter's prior prevote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Tuples exactly as revealed (duplicates and abstentions included).
    pub exchange_rate_tuples: ExchangeRateTuples,
    pub voter: ValidatorAddress,
    pub salt: String,
    pub submit_block: u64,
    /// The prevote hash this reveal was matched against.
    pub commitment: VoteHash,
}

impl Vote {
    pub fn period(&self, vote_period: u64) -> u64 {
        self.submit_block / vote_period
    }
}

/// The rate published for a pair at the end of a voting period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedExchangeRate {
    pub pair: AssetPair,
    pub exchange_rate: Decimal,
    pub block_height: u64,
    pub period: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prevote_period_uses_integer_division() {
        let voter = ValidatorAddress::new("pvvaloper_alice");
        let prevote = Prevote::new(VoteHash::ZERO, voter, 29);
        assert_eq!(prevote.period(10), 2);
        assert_eq!(prevote.period(30), 0);
    }
}
