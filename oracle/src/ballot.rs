//! Per-pair ballots and the stake-weighted median.

use pricevote_types::{AssetPair, ValidatorAddress, Vote};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One validator's positive rate for a pair, weighted by its bonded power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BallotEntry {
    pub voter: ValidatorAddress,
    pub rate: Decimal,
    pub power: u128,
}

/// All entries for one pair in one period, sorted ascending by (rate, voter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub pair: AssetPair,
    entries: Vec<BallotEntry>,
}

impl Ballot {
    pub fn new(pair: AssetPair, mut entries: Vec<BallotEntry>) -> Self {
        entries.sort_by(|a, b| a.rate.cmp(&b.rate).then_with(|| a.voter.cmp(&b.voter)));
        Self { pair, entries }
    }

    pub fn entries(&self) -> &[BallotEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total power behind this ballot.
    pub fn power(&self) -> u128 {
        self.entries
            .iter()
            .fold(0u128, |acc, e| acc.saturating_add(e.power))
    }

    /// The rate at the first entry whose cumulative power reaches half the
    /// total. On an exact half split this is the lower of the two middle rates.
    ///
    /// `None` for an empty or powerless ballot.
    pub fn weighted_median(&self) -> Option<Decimal> {
        let total = self.power();
        if total == 0 {
            return None;
        }
        let mut cumulative = 0u128;
        for entry in &self.entries {
            cumulative = cumulative.saturating_add(entry.power);
            if cumulative.saturating_mul(2) >= total {
                return Some(entry.rate);
            }
        }
        None
    }
}

/// Build one ballot per active pair from the period's votes.
///
/// Only positive rates from voters present in `powers` count. Within one vote
/// the last tuple for a pair wins. Tuples on pairs outside `pairs` are ignored.
pub fn organize_ballots(
    votes: &[Vote],
    powers: &BTreeMap<ValidatorAddress, u128>,
    pairs: &[AssetPair],
) -> BTreeMap<AssetPair, Ballot> {
    let mut grouped: BTreeMap<AssetPair, Vec<BallotEntry>> =
        pairs.iter().map(|p| (p.clone(), Vec::new())).collect();

    for vote in votes {
        let Some(&power) = powers.get(&vote.voter) else {
            continue;
        };
        if power == 0 {
            continue;
        }
        for (pair, rate) in vote.exchange_rate_tuples.latest_by_pair() {
            if rate <= Decimal::ZERO {
                continue;
            }
            if let Some(entries) = grouped.get_mut(pair) {
                entries.push(BallotEntry {
                    voter: vote.voter.clone(),
                    rate,
                    power,
                });
            }
        }
    }

    grouped
        .into_iter()
        .map(|(pair, entries)| (pair.clone(), Ballot::new(pair, entries)))
        .collect()
}
