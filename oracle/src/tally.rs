//! Period tally: one weighted median per active pair, plus per-validator
//! reward and participation claims.

use crate::ballot::{organize_ballots, Ballot};
use pricevote_types::{AssetPair, OracleParams, ValidatorAddress, Vote, BPS_DENOMINATOR};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Result of tallying one pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairTally {
    pub pair: AssetPair,
    /// Rate to publish. `None` when nobody reported or the ballot fell below
    /// the vote threshold; the previous published rate then stays in place.
    pub median: Option<Decimal>,
    pub ballot_power: u128,
    pub reporters: usize,
    /// Reporters inside the reward band.
    pub winners: Vec<ValidatorAddress>,
    /// Reporters outside the reward band.
    pub outliers: Vec<ValidatorAddress>,
    pub below_threshold: bool,
}

/// A bonded validator's participation in one period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorClaim {
    pub validator: ValidatorAddress,
    pub power: u128,
    /// Whether a valid vote was revealed this period.
    pub voted: bool,
    /// Active pairs reported with a positive rate.
    pub reported_pairs: usize,
    /// Published pairs reported inside the reward band.
    pub win_count: usize,
    /// Active pairs without a positive rate from this validator.
    pub missed_pairs: Vec<AssetPair>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyOutcome {
    pub pairs: Vec<PairTally>,
    pub claims: BTreeMap<ValidatorAddress, ValidatorClaim>,
    pub total_power: u128,
}

impl TallyOutcome {
    /// Pairs that receive a new published rate.
    pub fn published(&self) -> impl Iterator<Item = (&AssetPair, Decimal)> {
        self.pairs
            .iter()
            .filter_map(|t| t.median.map(|m| (&t.pair, m)))
    }
}

/// Stake-weighted median tally.
#[derive(Clone, Copy, Debug)]
pub struct TallyEngine {
    pub vote_threshold_bps: u32,
    pub reward_band_bps: u32,
}

impl TallyEngine {
    pub fn from_params(params: &OracleParams) -> Self {
        Self {
            vote_threshold_bps: params.vote_threshold_bps,
            reward_band_bps: params.reward_band_bps,
        }
    }

    /// Tally the period's votes over the active `pairs`.
    ///
    /// `validators` is the bonded set; votes from anyone else are ignored.
    pub fn tally(
        &self,
        votes: &[Vote],
        validators: &[(ValidatorAddress, u128)],
        pairs: &[AssetPair],
    ) -> TallyOutcome {
        let powers: BTreeMap<ValidatorAddress, u128> = validators
            .iter()
            .filter(|(_, power)| *power > 0)
            .cloned()
            .collect();
        let total_power = powers.values().fold(0u128, |acc, p| acc.saturating_add(*p));
        let voters: BTreeSet<&ValidatorAddress> = votes.iter().map(|v| &v.voter).collect();

        let mut claims: BTreeMap<ValidatorAddress, ValidatorClaim> = powers
            .iter()
            .map(|(validator, power)| {
                (
                    validator.clone(),
                    ValidatorClaim {
                        validator: validator.clone(),
                        power: *power,
                        voted: voters.contains(validator),
                        reported_pairs: 0,
                        win_count: 0,
                        missed_pairs: pairs.to_vec(),
                    },
                )
            })
            .collect();

        let ballots = organize_ballots(votes, &powers, pairs);
        let mut tallies = Vec::with_capacity(ballots.len());

        for ballot in ballots.values() {
            for entry in ballot.entries() {
                if let Some(claim) = claims.get_mut(&entry.voter) {
                    claim.reported_pairs += 1;
                    claim.missed_pairs.retain(|p| *p != ballot.pair);
                }
            }

            let tally = self.tally_pair(ballot, total_power);
            for winner in &tally.winners {
                if let Some(claim) = claims.get_mut(winner) {
                    claim.win_count += 1;
                }
            }
            tallies.push(tally);
        }

        TallyOutcome {
            pairs: tallies,
            claims,
            total_power,
        }
    }

    fn tally_pair(&self, ballot: &Ballot, total_power: u128) -> PairTally {
        let ballot_power = ballot.power();
        let below_threshold = !self.meets_threshold(ballot_power, total_power);
        let median = if below_threshold {
            None
        } else {
            ballot.weighted_median()
        };

        let mut winners = Vec::new();
        let mut outliers = Vec::new();
        if let Some(median) = median {
            for entry in ballot.entries() {
                if self.within_band(entry.rate, median) {
                    winners.push(entry.voter.clone());
                } else {
                    outliers.push(entry.voter.clone());
                }
            }
        }

        PairTally {
            pair: ballot.pair.clone(),
            median,
            ballot_power,
            reporters: ballot.len(),
            winners,
            outliers,
            below_threshold: below_threshold && !ballot.is_empty(),
        }
    }

    fn meets_threshold(&self, ballot_power: u128, total_power: u128) -> bool {
        if self.vote_threshold_bps == 0 {
            return true;
        }
        ballot_power.saturating_mul(BPS_DENOMINATOR)
            >= u128::from(self.vote_threshold_bps).saturating_mul(total_power)
    }

    /// `|rate - median| <= median * reward_band`.
    pub fn within_band(&self, rate: Decimal, median: Decimal) -> bool {
        let band = Decimal::new(i64::from(self.reward_band_bps), 4);
        let spread = median.checked_mul(band).unwrap_or(Decimal::MAX);
        (rate - median).abs() <= spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricevote_types::VoteHash;
    use rust_decimal_macros::dec;

    fn val(name: &str) -> ValidatorAddress {
        ValidatorAddress::new(format!("pvvaloper_{name}"))
    }

    fn pair(s: &str) -> AssetPair {
        AssetPair::must_parse(s)
    }

    fn vote(name: &str, tuples: &str) -> Vote {
        Vote {
            exchange_rate_tuples: tuples.parse().unwrap(),
            voter: val(name),
            salt: "s".into(),
            submit_block: 10,
            commitment: VoteHash::ZERO,
        }
    }

    fn engine(band_bps: u32) -> TallyEngine {
        TallyEngine {
            vote_threshold_bps: 0,
            reward_band_bps: band_bps,
        }
    }

    #[test]
    fn sixty_forty_publishes_majority_rate() {
        let votes = vec![vote("a", "(btc:usd,100)"), vote("b", "(btc:usd,110)")];
        let validators = vec![(val("a"), 60), (val("b"), 40)];
        let outcome = engine(500).tally(&votes, &validators, &[pair("btc:usd")]);

        let btc = &outcome.pairs[0];
        assert_eq!(btc.median, Some(dec!(100)));
        assert_eq!(btc.winners, vec![val("a")]);
        assert_eq!(btc.outliers, vec![val("b")]);
        assert_eq!(outcome.claims[&val("a")].win_count, 1);
        assert_eq!(outcome.claims[&val("b")].win_count, 0);
        // outside the band is still a report
        assert_eq!(outcome.claims[&val("b")].reported_pairs, 1);
        assert_eq!(outcome.total_power, 100);
    }

    #[test]
    fn pair_without_reporters_is_not_published() {
        let votes = vec![vote("a", "(btc:usd,100)")];
        let validators = vec![(val("a"), 10)];
        let outcome = engine(200).tally(&votes, &validators, &[pair("btc:usd"), pair("eth:usd")]);

        let published: Vec<_> = outcome.published().map(|(p, _)| p.clone()).collect();
        assert_eq!(published, vec![pair("btc:usd")]);
        assert_eq!(outcome.claims[&val("a")].missed_pairs, vec![pair("eth:usd")]);
        let eth = outcome.pairs.iter().find(|t| t.pair == pair("eth:usd")).unwrap();
        assert!(!eth.below_threshold);
        assert_eq!(eth.reporters, 0);
    }

    #[test]
    fn validators_without_votes_get_empty_claims() {
        let validators = vec![(val("a"), 10), (val("idle"), 10)];
        let votes = vec![vote("a", "(btc:usd,100)")];
        let outcome = engine(200).tally(&votes, &validators, &[pair("btc:usd")]);
        let idle = &outcome.claims[&val("idle")];
        assert!(!idle.voted);
        assert_eq!(idle.reported_pairs, 0);
    }

    #[test]
    fn ballot_below_threshold_is_withheld() {
        let tally = TallyEngine {
            vote_threshold_bps: 5_000,
            reward_band_bps: 200,
        };
        let votes = vec![vote("a", "(btc:usd,100)")];
        let validators = vec![(val("a"), 30), (val("b"), 70)];
        let outcome = tally.tally(&votes, &validators, &[pair("btc:usd")]);
        let btc = &outcome.pairs[0];
        assert!(btc.below_threshold);
        assert_eq!(btc.median, None);
        assert_eq!(outcome.claims[&val("a")].reported_pairs, 1);
        assert_eq!(outcome.claims[&val("a")].win_count, 0);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let tally = engine(500);
        assert!(tally.within_band(dec!(105), dec!(100)));
        assert!(tally.within_band(dec!(95), dec!(100)));
        assert!(!tally.within_band(dec!(105.01), dec!(100)));
    }
}
