//! Oracle parameters: every value the voting protocol reads.
//!
//! Ratios are basis points (10_000 = 100%). Periods are counted in blocks,
//! slashing windows in voting periods.

use crate::pair::AssetPair;
use serde::{Deserialize, Serialize};

pub const BPS_DENOMINATOR: u128 = 10_000;

/// All governable oracle parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleParams {
    /// Number of blocks in one voting period.
    pub vote_period: u64,

    /// Minimum share of total bonded power a pair's ballot must carry to be
    /// published. 0 disables the check.
    pub vote_threshold_bps: u32,

    /// Maximum relative deviation from the median that still earns a reward.
    pub reward_band_bps: u32,

    /// Minimum share of whitelisted pairs a validator must report (positive
    /// rate) for its period not to count as a miss.
    pub min_valid_pairs_bps: u32,

    /// Number of voting periods per slashing window.
    pub slash_window: u64,

    /// A validator whose miss rate over a window exceeds this is flagged for slashing.
    pub max_miss_rate_bps: u32,

    /// Fraction of stake the external slashing module should burn.
    pub slash_fraction_bps: u32,

    /// Pairs eligible for voting.
    pub whitelist: Vec<AssetPair>,
}

impl OracleParams {
    /// Blocks in one slashing window.
    pub fn slash_window_blocks(&self) -> u64 {
        self.vote_period.saturating_mul(self.slash_window)
    }

    /// Voting period containing `height`.
    pub fn period_of(&self, height: u64) -> u64 {
        height / self.vote_period
    }

    /// Whether `height` is the final block of its voting period.
    pub fn is_period_last_block(&self, height: u64) -> bool {
        (height + 1) % self.vote_period == 0
    }

    /// Whether `period` closes a slashing window.
    pub fn is_window_last_period(&self, period: u64) -> bool {
        (period + 1) % self.slash_window == 0
    }

    /// Reject parameter sets the protocol cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.vote_period == 0 {
            return Err("vote_period must be positive".into());
        }
        if self.slash_window == 0 {
            return Err("slash_window must be positive".into());
        }
        for (name, bps) in [
            ("vote_threshold_bps", self.vote_threshold_bps),
            ("reward_band_bps", self.reward_band_bps),
            ("min_valid_pairs_bps", self.min_valid_pairs_bps),
            ("max_miss_rate_bps", self.max_miss_rate_bps),
            ("slash_fraction_bps", self.slash_fraction_bps),
        ] {
            if u128::from(bps) > BPS_DENOMINATOR {
                return Err(format!("{name} must not exceed {BPS_DENOMINATOR}"));
            }
        }
        let mut seen = std::collections::BTreeSet::new();
        for pair in &self.whitelist {
            if !seen.insert(pair) {
                return Err(format!("duplicate whitelist pair {pair}"));
            }
        }
        Ok(())
    }
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            vote_period: 10,
            vote_threshold_bps: 0,
            reward_band_bps: 200,      // 2%
            min_valid_pairs_bps: 10_000, // every whitelisted pair
            slash_window: 1_000,
            max_miss_rate_bps: 9_500, // 95%
            slash_fraction_bps: 1,    // 0.01%
            whitelist: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        OracleParams::default().validate().unwrap();
    }

    #[test]
    fn period_boundaries() {
        let params = OracleParams {
            vote_period: 5,
            slash_window: 3,
            ..Default::default()
        };
        assert_eq!(params.period_of(4), 0);
        assert_eq!(params.period_of(5), 1);
        assert!(params.is_period_last_block(4));
        assert!(!params.is_period_last_block(5));
        assert!(params.is_window_last_period(2));
        assert!(!params.is_window_last_period(3));
        assert_eq!(params.slash_window_blocks(), 15);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_period = OracleParams {
            vote_period: 0,
            ..Default::default()
        };
        assert!(zero_period.validate().is_err());

        let band = OracleParams {
            reward_band_bps: 10_001,
            ..Default::default()
        };
        assert!(band.validate().is_err());

        let dup = OracleParams {
            whitelist: vec![AssetPair::must_parse("btc:usd"), AssetPair::must_parse("btc:usd")],
            ..Default::default()
        };
        assert!(dup.validate().is_err());
    }
}
