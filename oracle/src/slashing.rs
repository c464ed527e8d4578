//! Miss counting and slashing-window decisions.
//!
//! A bonded validator misses a period when it revealed no valid vote, or when
//! it reported too few of the active pairs. Reporting outside the reward band
//! costs the reward, never a miss. When a window closes every counter is
//! evaluated against the maximum miss rate and then reset.

use crate::error::OracleError;
use crate::tally::{TallyOutcome, ValidatorClaim};
use pricevote_store::MissCounterStore;
use pricevote_types::{OracleParams, ValidatorAddress, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether the settled period closes the slashing window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowBoundary {
    Inside,
    Closes,
}

/// Window-end verdict for one validator, handed to the external slashing module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashDecision {
    pub validator: ValidatorAddress,
    pub miss_count: u64,
    pub should_slash: bool,
    pub slash_fraction_bps: u32,
}

/// Counter changes made while settling one period.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MissUpdate {
    /// Validators that missed, with their counts after the increment.
    pub recorded: Vec<(ValidatorAddress, u64)>,
    /// Present only when the period closed the window.
    pub decisions: Option<Vec<SlashDecision>>,
}

#[derive(Clone, Copy, Debug)]
pub struct MissCounterPolicy {
    pub min_valid_pairs_bps: u32,
    pub slash_window: u64,
    pub max_miss_rate_bps: u32,
    pub slash_fraction_bps: u32,
}

impl MissCounterPolicy {
    pub fn from_params(params: &OracleParams) -> Self {
        Self {
            min_valid_pairs_bps: params.min_valid_pairs_bps,
            slash_window: params.slash_window,
            max_miss_rate_bps: params.max_miss_rate_bps,
            slash_fraction_bps: params.slash_fraction_bps,
        }
    }

    /// Whether `claim` counts as a miss with `active_pairs` whitelisted.
    pub fn is_miss(&self, claim: &ValidatorClaim, active_pairs: usize) -> bool {
        if active_pairs == 0 {
            return false;
        }
        if !claim.voted {
            return true;
        }
        let reported = (claim.reported_pairs as u128).saturating_mul(BPS_DENOMINATOR);
        let required = u128::from(self.min_valid_pairs_bps).saturating_mul(active_pairs as u128);
        reported < required
    }

    /// Validators that missed this period, in address order.
    pub fn missed_validators(
        &self,
        outcome: &TallyOutcome,
        active_pairs: usize,
    ) -> Vec<ValidatorAddress> {
        outcome
            .claims
            .values()
            .filter(|claim| self.is_miss(claim, active_pairs))
            .map(|claim| claim.validator.clone())
            .collect()
    }

    /// `miss_count / slash_window > max_miss_rate`.
    pub fn exceeds_threshold(&self, miss_count: u64) -> bool {
        u128::from(miss_count).saturating_mul(BPS_DENOMINATOR)
            > u128::from(self.max_miss_rate_bps).saturating_mul(u128::from(self.slash_window))
    }

    /// Increment the counter of every missed validator. Returns the new counts.
    pub fn record_misses<S: MissCounterStore>(
        &self,
        store: &S,
        missed: &[ValidatorAddress],
    ) -> Result<Vec<(ValidatorAddress, u64)>, OracleError> {
        let mut counts = Vec::with_capacity(missed.len());
        for validator in missed {
            let count = store.get_miss_counter(validator)?.saturating_add(1);
            store.put_miss_counter(validator, count)?;
            counts.push((validator.clone(), count));
        }
        Ok(counts)
    }

    /// Evaluate every counter holder and bonded validator, then reset all counters.
    pub fn close_window<S: MissCounterStore>(
        &self,
        store: &S,
        bonded: &[(ValidatorAddress, u128)],
    ) -> Result<Vec<SlashDecision>, OracleError> {
        let counters = store.iter_miss_counters()?;
        let mut validators: BTreeSet<ValidatorAddress> =
            bonded.iter().map(|(v, _)| v.clone()).collect();
        validators.extend(counters.iter().map(|(v, _)| v.clone()));

        let mut decisions = Vec::with_capacity(validators.len());
        for validator in validators {
            let miss_count = store.get_miss_counter(&validator)?;
            decisions.push(SlashDecision {
                should_slash: self.exceeds_threshold(miss_count),
                validator,
                miss_count,
                slash_fraction_bps: self.slash_fraction_bps,
            });
        }

        for (validator, _) in counters {
            store.delete_miss_counter(&validator)?;
        }
        Ok(decisions)
    }

    /// Record this period's misses and, when the window closes, decide and reset.
    pub fn apply<S: MissCounterStore>(
        &self,
        store: &S,
        missed: &[ValidatorAddress],
        bonded: &[(ValidatorAddress, u128)],
        boundary: WindowBoundary,
    ) -> Result<MissUpdate, OracleError> {
        let recorded = self.record_misses(store, missed)?;
        let decisions = match boundary {
            WindowBoundary::Inside => None,
            WindowBoundary::Closes => Some(self.close_window(store, bonded)?),
        };
        Ok(MissUpdate {
            recorded,
            decisions,
        })
    }
}
