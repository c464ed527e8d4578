//! Commit/reveal submission rules.
//!
//! A prevote commits to a hash in period N; the matching vote must be revealed
//! in period N + 1. Each validator holds at most one prevote and one vote per
//! period: a second submission for the same slot is rejected, never queued.
//! A rejected submission leaves the stores untouched.

use crate::error::OracleError;
use pricevote_crypto::{verify_vote_hash, MAX_SALT_LEN};
use pricevote_store::{PairWhitelistStore, PrevoteStore, VoteStore};
use pricevote_types::{ExchangeRateTuples, Prevote, ValidatorAddress, Vote, VoteHash};
use rust_decimal::Decimal;

/// Validates and records prevotes and votes.
#[derive(Clone, Copy, Debug)]
pub struct CommitRevealEngine {
    vote_period: u64,
}

impl CommitRevealEngine {
    pub fn new(vote_period: u64) -> Result<Self, OracleError> {
        if vote_period == 0 {
            return Err(OracleError::InvalidParams(
                "vote_period must be positive".into(),
            ));
        }
        Ok(Self { vote_period })
    }

    pub fn vote_period(&self) -> u64 {
        self.vote_period
    }

    /// Record a commitment for the period containing `height`.
    ///
    /// A prevote left over from an earlier period is replaced; feeders reveal
    /// the old commitment before committing again.
    pub fn submit_prevote<S: PrevoteStore>(
        &self,
        store: &S,
        voter: &ValidatorAddress,
        hash: VoteHash,
        height: u64,
    ) -> Result<Prevote, OracleError> {
        let period = height / self.vote_period;
        if let Some(existing) = store.get_prevote(voter)? {
            if existing.period(self.vote_period) == period {
                return Err(OracleError::DuplicatePrevote {
                    voter: voter.to_string(),
                    period,
                });
            }
        }
        let prevote = Prevote::new(hash, voter.clone(), height);
        store.put_prevote(&prevote)?;
        Ok(prevote)
    }

    /// Reveal the tuples committed to in the previous period.
    pub fn submit_vote<S: PrevoteStore + VoteStore + PairWhitelistStore>(
        &self,
        store: &S,
        voter: &ValidatorAddress,
        tuples: ExchangeRateTuples,
        salt: &str,
        height: u64,
    ) -> Result<Vote, OracleError> {
        let period = height / self.vote_period;
        let prevote = store
            .get_prevote(voter)?
            .filter(|p| p.period(self.vote_period) + 1 == period)
            .ok_or_else(|| OracleError::NoMatchingPrevote {
                voter: voter.to_string(),
                expected_period: period.saturating_sub(1),
            })?;

        if let Some(existing) = store.get_vote(voter)? {
            if existing.period(self.vote_period) == period {
                return Err(OracleError::DuplicateVote {
                    voter: voter.to_string(),
                    period,
                });
            }
        }

        validate_salt(salt)?;
        self.validate_tuples(store, &tuples)?;

        if !verify_vote_hash(&prevote.hash, salt, &tuples, voter) {
            return Err(OracleError::HashMismatch(voter.to_string()));
        }

        let vote = Vote {
            exchange_rate_tuples: tuples,
            voter: voter.clone(),
            salt: salt.to_string(),
            submit_block: height,
            commitment: prevote.hash,
        };
        store.put_vote(&vote)?;
        Ok(vote)
    }

    fn validate_tuples<S: PairWhitelistStore>(
        &self,
        store: &S,
        tuples: &ExchangeRateTuples,
    ) -> Result<(), OracleError> {
        if tuples.is_empty() {
            return Err(OracleError::InvalidTuples("vote carries no exchange rates".into()));
        }
        for tuple in tuples.iter() {
            if !store.is_whitelisted(&tuple.pair)? {
                return Err(OracleError::PairNotWhitelisted(tuple.pair.to_string()));
            }
            if tuple.exchange_rate < Decimal::ZERO {
                return Err(OracleError::NonPositiveRate {
                    pair: tuple.pair.to_string(),
                    rate: tuple.exchange_rate.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Salts must be non-empty, bounded, and free of the hash field separator.
fn validate_salt(salt: &str) -> Result<(), OracleError> {
    if salt.is_empty() {
        return Err(OracleError::InvalidSalt("salt is empty".into()));
    }
    if salt.len() > MAX_SALT_LEN {
        return Err(OracleError::InvalidSalt(format!(
            "salt is {} bytes, limit is {MAX_SALT_LEN}",
            salt.len()
        )));
    }
    if salt.contains(':') {
        return Err(OracleError::InvalidSalt("salt contains ':'".into()));
    }
    Ok(())
}
