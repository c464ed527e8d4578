//! Voting period coordinator: drives commit/reveal rounds through tally,
//! miss counting, slashing windows and clearing, one period at a time.
//!
//! During period N the round for N collects prevotes while the round for N-1
//! collects the matching reveals. At the last block of N, round N-1 is tallied
//! and settled, round N starts accepting reveals, and round N+1 opens.

use crate::commit_reveal::CommitRevealEngine;
use crate::error::OracleError;
use crate::events::OracleEvent;
use crate::registry::PairRegistry;
use crate::slashing::{MissCounterPolicy, SlashDecision, WindowBoundary};
use crate::tally::{TallyEngine, TallyOutcome};
use pricevote_crypto::verify_vote_hash;
use pricevote_store::OracleStore;
use pricevote_types::{
    AggregatedExchangeRate, AssetPair, ExchangeRateTuples, OracleParams, Prevote,
    ValidatorAddress, Vote, VoteHash,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    AwaitingPrevotes,
    AwaitingVotes,
    Tallying,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRound {
    pub period: u64,
    pub phase: RoundPhase,
}

/// Per-period reward signal for the external rewards module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardClaim {
    pub validator: ValidatorAddress,
    pub power: u128,
    pub win_count: usize,
    pub reward_eligible: bool,
}

/// Everything a settled period produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// The period whose last block triggered the settlement.
    pub period: u64,
    pub block_height: u64,
    pub published: Vec<AggregatedExchangeRate>,
    /// Active pairs whose previous rate was left in place.
    pub unchanged_pairs: Vec<AssetPair>,
    pub rewards: Vec<RewardClaim>,
    /// Validators that missed, with their counters after this period.
    pub missed: Vec<(ValidatorAddress, u64)>,
    /// False when the reveal round was never opened (first period after start).
    pub misses_counted: bool,
    /// Present when this period closed a slashing window.
    pub slash_decisions: Option<Vec<SlashDecision>>,
}

impl PeriodReport {
    /// Validators flagged for slashing.
    pub fn flagged(&self) -> impl Iterator<Item = &SlashDecision> {
        self.slash_decisions
            .iter()
            .flatten()
            .filter(|d| d.should_slash)
    }
}

/// Serializable coordinator state for persistence across restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub params: OracleParams,
    pub first_period: u64,
    pub rounds: Vec<VotingRound>,
    pub last_boundary: Option<u64>,
    pub tallying: Option<u64>,
}

pub struct VotingPeriodCoordinator<S: OracleStore> {
    store: S,
    params: OracleParams,
    engine: CommitRevealEngine,
    tally: TallyEngine,
    policy: MissCounterPolicy,
    /// Period the coordinator started in. Its reveal round never existed.
    first_period: u64,
    rounds: BTreeMap<u64, RoundPhase>,
    /// Last period whose boundary has been settled.
    last_boundary: Option<u64>,
    /// Boundary period currently being settled; stays set if settlement aborts.
    tallying: Option<u64>,
    pending_events: Vec<OracleEvent>,
}

impl<S: OracleStore> VotingPeriodCoordinator<S> {
    /// Start coordinating at `start_height`. The configured whitelist replaces
    /// whatever the store holds.
    ///
    /// Round state left in the store by an earlier run belongs to rounds this
    /// coordinator never opened: prevotes from before the first period, every
    /// vote and every miss counter are discarded. Use [`Self::restore`] to
    /// resume a run instead.
    pub fn new(store: S, params: OracleParams, start_height: u64) -> Result<Self, OracleError> {
        params.validate().map_err(OracleError::InvalidParams)?;
        let engine = CommitRevealEngine::new(params.vote_period)?;
        PairRegistry.apply_whitelist(&store, &params.whitelist)?;
        let first_period = params.period_of(start_height);
        Self::discard_stale_rounds(&store, &params, first_period)?;

        tracing::info!(
            start_height,
            period = first_period,
            vote_period = params.vote_period,
            pairs = params.whitelist.len(),
            "oracle coordinator started"
        );

        Ok(Self {
            engine,
            tally: TallyEngine::from_params(&params),
            policy: MissCounterPolicy::from_params(&params),
            first_period,
            rounds: BTreeMap::from([(first_period, RoundPhase::AwaitingPrevotes)]),
            last_boundary: None,
            tallying: None,
            pending_events: Vec::new(),
            store,
            params,
        })
    }

    fn discard_stale_rounds(
        store: &S,
        params: &OracleParams,
        first_period: u64,
    ) -> Result<(), OracleError> {
        let mut prevotes = 0;
        for prevote in store.iter_prevotes()? {
            if prevote.period(params.vote_period) < first_period {
                store.delete_prevote(&prevote.voter)?;
                prevotes += 1;
            }
        }
        let votes = store.iter_votes()?;
        for vote in &votes {
            store.delete_vote(&vote.voter)?;
        }
        let counters = store.iter_miss_counters()?;
        for (validator, _) in &counters {
            store.delete_miss_counter(validator)?;
        }
        if prevotes + votes.len() + counters.len() > 0 {
            tracing::info!(
                period = first_period,
                prevotes,
                votes = votes.len(),
                miss_counters = counters.len(),
                "discarded round state from a previous run"
            );
        }
        Ok(())
    }

    // ── Submissions ─────────────────────────────────────────────────────

    /// Accept a commitment from `voter` at `height`.
    pub fn submit_prevote(
        &mut self,
        voter: &ValidatorAddress,
        hash: VoteHash,
        height: u64,
    ) -> Result<Prevote, OracleError> {
        let period = self.params.period_of(height);
        self.ensure_open(period)?;
        let result = self.engine.submit_prevote(&self.store, voter, hash, height);
        match &result {
            Ok(_) => {
                tracing::debug!(voter = %voter, period, "prevote accepted");
                self.pending_events.push(OracleEvent::PrevoteAccepted {
                    voter: voter.clone(),
                    period,
                });
            }
            Err(e) => self.record_rejection(voter, e),
        }
        result
    }

    /// Accept a reveal from `voter` at `height`, matched against its prevote
    /// from the previous period.
    pub fn submit_vote(
        &mut self,
        voter: &ValidatorAddress,
        tuples: ExchangeRateTuples,
        salt: &str,
        height: u64,
    ) -> Result<Vote, OracleError> {
        let period = self.params.period_of(height);
        self.ensure_open(period)?;
        let result = self
            .engine
            .submit_vote(&self.store, voter, tuples, salt, height);
        match &result {
            Ok(vote) => {
                tracing::debug!(
                    voter = %voter,
                    period,
                    tuples = vote.exchange_rate_tuples.len(),
                    "vote accepted"
                );
                self.pending_events.push(OracleEvent::VoteAccepted {
                    voter: voter.clone(),
                    period,
                });
            }
            Err(e) => self.record_rejection(voter, e),
        }
        result
    }

    fn record_rejection(&mut self, voter: &ValidatorAddress, error: &OracleError) {
        if error.is_rejection() {
            tracing::debug!(voter = %voter, error = %error, "submission rejected");
            self.pending_events.push(OracleEvent::SubmissionRejected {
                voter: voter.clone(),
                reason: error.to_string(),
            });
        } else {
            tracing::error!(voter = %voter, error = %error, "submission failed");
        }
    }

    fn ensure_open(&self, period: u64) -> Result<(), OracleError> {
        match self.rounds.get(&period) {
            Some(RoundPhase::AwaitingPrevotes) => Ok(()),
            _ => Err(OracleError::InvariantViolation(format!(
                "period {period} is not open for submissions"
            ))),
        }
    }

    // ── Period boundary ─────────────────────────────────────────────────

    /// Settle the period ending at `height`.
    ///
    /// Returns `None` when `height` is not a period's last block, or when the
    /// period was already settled. `validators` is the bonded set with power.
    pub fn settle_period(
        &mut self,
        height: u64,
        validators: &[(ValidatorAddress, u128)],
    ) -> Result<Option<PeriodReport>, OracleError> {
        if !self.params.is_period_last_block(height) {
            return Ok(None);
        }
        let period = self.params.period_of(height);

        if let Some(stuck) = self.tallying {
            let err = OracleError::InvariantViolation(format!(
                "period {stuck} is still tallying, cannot settle period {period}"
            ));
            tracing::error!(period, error = %err, "period settlement refused");
            return Err(err);
        }
        if self.last_boundary.is_some_and(|last| period <= last) {
            tracing::debug!(period, "period already settled");
            return Ok(None);
        }
        if let Err(err) = self.ensure_open(period) {
            tracing::error!(period, error = %err, "period settled out of order");
            return Err(err);
        }

        let reveal_round = period
            .checked_sub(1)
            .filter(|p| self.rounds.contains_key(p));
        self.tallying = Some(period);
        if let Some(round) = reveal_round {
            self.rounds.insert(round, RoundPhase::Tallying);
        }

        let report = match self.run_settlement(period, height, validators, reveal_round.is_some())
        {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(period, height, error = %err, "period settlement aborted");
                return Err(err);
            }
        };

        self.tallying = None;
        self.last_boundary = Some(period);
        if let Some(round) = reveal_round {
            self.rounds.insert(round, RoundPhase::Settled);
        }
        self.rounds.insert(period, RoundPhase::AwaitingVotes);
        self.rounds.insert(period + 1, RoundPhase::AwaitingPrevotes);
        let keep_from = reveal_round.unwrap_or(period);
        self.rounds.retain(|p, _| *p >= keep_from);

        self.pending_events.push(OracleEvent::PeriodSettled {
            period,
            block_height: height,
        });
        tracing::info!(
            period,
            height,
            published = report.published.len(),
            unchanged = report.unchanged_pairs.len(),
            missed = report.missed.len(),
            window_closed = report.slash_decisions.is_some(),
            "period settled"
        );
        Ok(Some(report))
    }

    fn run_settlement(
        &mut self,
        period: u64,
        height: u64,
        validators: &[(ValidatorAddress, u128)],
        misses_counted: bool,
    ) -> Result<PeriodReport, OracleError> {
        let pairs = self.store.iter_pairs()?;
        let votes = self.store.iter_votes()?;
        for vote in &votes {
            self.check_vote(vote, period)?;
        }

        let outcome = self.tally.tally(&votes, validators, &pairs);
        let (published, unchanged_pairs) = self.publish(&outcome, period, height)?;

        let missed = if misses_counted {
            self.policy.missed_validators(&outcome, pairs.len())
        } else {
            Vec::new()
        };
        let boundary = if self.params.is_window_last_period(period) {
            WindowBoundary::Closes
        } else {
            WindowBoundary::Inside
        };
        let update = self
            .policy
            .apply(&self.store, &missed, validators, boundary)?;

        for (validator, miss_count) in &update.recorded {
            self.pending_events.push(OracleEvent::ValidatorMissed {
                validator: validator.clone(),
                miss_count: *miss_count,
            });
        }
        for decision in update.decisions.iter().flatten().filter(|d| d.should_slash) {
            tracing::warn!(
                validator = %decision.validator,
                miss_count = decision.miss_count,
                slash_window = self.params.slash_window,
                "validator flagged for slashing"
            );
            self.pending_events.push(OracleEvent::SlashFlagged {
                validator: decision.validator.clone(),
                miss_count: decision.miss_count,
                slash_fraction_bps: decision.slash_fraction_bps,
            });
        }

        self.clear_period(period)?;

        let rewards = outcome
            .claims
            .values()
            .map(|claim| RewardClaim {
                validator: claim.validator.clone(),
                power: claim.power,
                win_count: claim.win_count,
                reward_eligible: claim.win_count > 0,
            })
            .collect();

        Ok(PeriodReport {
            period,
            block_height: height,
            published,
            unchanged_pairs,
            rewards,
            missed: update.recorded,
            misses_counted,
            slash_decisions: update.decisions,
        })
    }

    /// A stored vote must belong to the period being settled and still match
    /// the commitment it was accepted against.
    fn check_vote(&self, vote: &Vote, period: u64) -> Result<(), OracleError> {
        let vote_period = vote.period(self.params.vote_period);
        if vote_period != period {
            return Err(OracleError::InvariantViolation(format!(
                "vote of {} from period {vote_period} survived into period {period}",
                vote.voter
            )));
        }
        if !verify_vote_hash(
            &vote.commitment,
            &vote.salt,
            &vote.exchange_rate_tuples,
            &vote.voter,
        ) {
            return Err(OracleError::InvariantViolation(format!(
                "stored vote of {} does not match its commitment",
                vote.voter
            )));
        }
        Ok(())
    }

    fn publish(
        &mut self,
        outcome: &TallyOutcome,
        period: u64,
        height: u64,
    ) -> Result<(Vec<AggregatedExchangeRate>, Vec<AssetPair>), OracleError> {
        let mut published = Vec::new();
        let mut unchanged = Vec::new();
        for pair_tally in &outcome.pairs {
            let Some(median) = pair_tally.median else {
                unchanged.push(pair_tally.pair.clone());
                continue;
            };
            let rate = AggregatedExchangeRate {
                pair: pair_tally.pair.clone(),
                exchange_rate: median,
                block_height: height,
                period,
            };
            self.store.put_exchange_rate(&rate)?;
            self.pending_events.push(OracleEvent::ExchangeRatePublished {
                pair: rate.pair.clone(),
                exchange_rate: median,
                period,
            });
            published.push(rate);
        }
        Ok((published, unchanged))
    }

    /// Delete every vote and every prevote from a period before `period`.
    ///
    /// Prevotes from `period` itself survive: they are revealed next period.
    /// Running this twice changes nothing. Returns (prevotes, votes) removed.
    pub fn clear_period(&self, period: u64) -> Result<(usize, usize), OracleError> {
        let mut prevotes_removed = 0;
        for prevote in self.store.iter_prevotes()? {
            if prevote.period(self.params.vote_period) < period {
                self.store.delete_prevote(&prevote.voter)?;
                prevotes_removed += 1;
            }
        }
        let votes = self.store.iter_votes()?;
        for vote in &votes {
            self.store.delete_vote(&vote.voter)?;
        }
        Ok((prevotes_removed, votes.len()))
    }

    // ── Parameters ──────────────────────────────────────────────────────

    /// Replace the pair whitelist. Returns whether it changed.
    pub fn apply_whitelist(&mut self, pairs: &[AssetPair]) -> Result<bool, OracleError> {
        let mut params = self.params.clone();
        params.whitelist = pairs.to_vec();
        params.validate().map_err(OracleError::InvalidParams)?;
        let changed = PairRegistry.apply_whitelist(&self.store, pairs)?;
        self.params = params;
        if changed {
            tracing::info!(pairs = pairs.len(), "pair whitelist updated");
        }
        Ok(changed)
    }

    /// Swap in new parameters. The vote period is fixed for the lifetime of
    /// the coordinator since stored prevotes are bucketed by it.
    pub fn update_params(&mut self, params: OracleParams) -> Result<(), OracleError> {
        params.validate().map_err(OracleError::InvalidParams)?;
        if params.vote_period != self.params.vote_period {
            return Err(OracleError::InvalidParams(format!(
                "vote_period cannot change from {} to {}",
                self.params.vote_period, params.vote_period
            )));
        }
        PairRegistry.apply_whitelist(&self.store, &params.whitelist)?;
        self.tally = TallyEngine::from_params(&params);
        self.policy = MissCounterPolicy::from_params(&params);
        self.params = params;
        tracing::info!("oracle params updated");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn params(&self) -> &OracleParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Live rounds in period order.
    pub fn rounds(&self) -> Vec<VotingRound> {
        self.rounds
            .iter()
            .map(|(period, phase)| VotingRound {
                period: *period,
                phase: *phase,
            })
            .collect()
    }

    pub fn round(&self, period: u64) -> Option<VotingRound> {
        self.rounds.get(&period).map(|phase| VotingRound {
            period,
            phase: *phase,
        })
    }

    pub fn last_settled_period(&self) -> Option<u64> {
        self.last_boundary
    }

    pub fn exchange_rate(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<AggregatedExchangeRate>, OracleError> {
        Ok(self.store.get_exchange_rate(pair)?)
    }

    pub fn miss_counter(&self, validator: &ValidatorAddress) -> Result<u64, OracleError> {
        Ok(self.store.get_miss_counter(validator)?)
    }

    /// Take all pending events for processing.
    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            params: self.params.clone(),
            first_period: self.first_period,
            rounds: self.rounds(),
            last_boundary: self.last_boundary,
            tallying: self.tallying,
        }
    }

    /// Resume over a store that already holds the snapshot's period state.
    pub fn restore(store: S, snapshot: CoordinatorSnapshot) -> Result<Self, OracleError> {
        snapshot
            .params
            .validate()
            .map_err(OracleError::InvalidParams)?;
        let params = snapshot.params;
        let engine = CommitRevealEngine::new(params.vote_period)?;
        Ok(Self {
            engine,
            tally: TallyEngine::from_params(&params),
            policy: MissCounterPolicy::from_params(&params),
            first_period: snapshot.first_period,
            rounds: snapshot
                .rounds
                .into_iter()
                .map(|r| (r.period, r.phase))
                .collect(),
            last_boundary: snapshot.last_boundary,
            tallying: snapshot.tallying,
            pending_events: Vec::new(),
            store,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricevote_crypto::vote_hash;
    use pricevote_nullables::NullOracleStore;
    use pricevote_store::{MissCounterStore, PairWhitelistStore, PrevoteStore, VoteStore};
    use rust_decimal_macros::dec;

    const VP: u64 = 10;

    fn val(name: &str) -> ValidatorAddress {
        ValidatorAddress::new(format!("pvvaloper_{name}"))
    }

    fn pair(s: &str) -> AssetPair {
        AssetPair::must_parse(s)
    }

    fn params() -> OracleParams {
        OracleParams {
            vote_period: VP,
            reward_band_bps: 500,
            slash_window: 5,
            max_miss_rate_bps: 5_000,
            whitelist: vec![pair("btc:usd")],
            ..Default::default()
        }
    }

    fn coordinator() -> VotingPeriodCoordinator<NullOracleStore> {
        VotingPeriodCoordinator::new(NullOracleStore::new(), params(), 0).unwrap()
    }

    fn commit(c: &mut VotingPeriodCoordinator<NullOracleStore>, who: &str, text: &str, h: u64) {
        let tuples: ExchangeRateTuples = text.parse().unwrap();
        let hash = vote_hash("salt", &tuples, &val(who));
        c.submit_prevote(&val(who), hash, h).unwrap();
    }

    fn reveal(c: &mut VotingPeriodCoordinator<NullOracleStore>, who: &str, text: &str, h: u64) {
        c.submit_vote(&val(who), text.parse().unwrap(), "salt", h)
            .unwrap();
    }

    #[test]
    fn new_applies_whitelist_and_opens_first_round() {
        let c = coordinator();
        assert!(c.store().is_whitelisted(&pair("btc:usd")).unwrap());
        assert_eq!(
            c.rounds(),
            vec![VotingRound {
                period: 0,
                phase: RoundPhase::AwaitingPrevotes
            }]
        );
    }

    #[test]
    fn full_round_publishes_and_transitions() {
        let mut c = coordinator();
        let validators = vec![(val("a"), 60), (val("b"), 40)];
        commit(&mut c, "a", "(btc:usd,100)", 1);
        commit(&mut c, "b", "(btc:usd,110)", 2);

        let first = c.settle_period(9, &validators).unwrap().unwrap();
        assert!(!first.misses_counted);
        assert!(first.published.is_empty());
        assert_eq!(c.round(0).unwrap().phase, RoundPhase::AwaitingVotes);
        assert_eq!(c.round(1).unwrap().phase, RoundPhase::AwaitingPrevotes);

        reveal(&mut c, "a", "(btc:usd,100)", 12);
        reveal(&mut c, "b", "(btc:usd,110)", 13);
        let report = c.settle_period(19, &validators).unwrap().unwrap();

        assert_eq!(report.published.len(), 1);
        assert_eq!(report.published[0].exchange_rate, dec!(100));
        assert_eq!(report.published[0].period, 1);
        let eligible: Vec<_> = report
            .rewards
            .iter()
            .map(|r| (r.validator.clone(), r.reward_eligible))
            .collect();
        assert_eq!(eligible, vec![(val("a"), true), (val("b"), false)]);
        assert!(report.missed.is_empty());
        assert_eq!(c.round(0).unwrap().phase, RoundPhase::Settled);
        assert_eq!(c.round(1).unwrap().phase, RoundPhase::AwaitingVotes);
        assert!(c.store().iter_votes().unwrap().is_empty());
        assert!(c.store().iter_prevotes().unwrap().is_empty());

        let events = c.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            OracleEvent::ExchangeRatePublished { period: 1, .. }
        )));
        assert!(c.drain_events().is_empty());
    }

    #[test]
    fn settling_twice_is_a_noop() {
        let mut c = coordinator();
        let validators = vec![(val("a"), 10)];
        c.settle_period(9, &validators).unwrap().unwrap();
        c.settle_period(19, &validators).unwrap().unwrap();
        assert_eq!(c.miss_counter(&val("a")).unwrap(), 1);

        assert!(c.settle_period(19, &validators).unwrap().is_none());
        assert_eq!(c.miss_counter(&val("a")).unwrap(), 1);
        assert_eq!(c.clear_period(1).unwrap(), (0, 0));
    }

    #[test]
    fn non_boundary_heights_do_nothing() {
        let mut c = coordinator();
        assert!(c.settle_period(5, &[]).unwrap().is_none());
        assert_eq!(c.last_settled_period(), None);
    }

    #[test]
    fn skipping_a_period_is_an_invariant_violation() {
        let mut c = coordinator();
        let err = c.settle_period(19, &[]).unwrap_err();
        assert!(matches!(err, OracleError::InvariantViolation(_)));
    }

    #[test]
    fn submissions_for_unopened_period_fail() {
        let mut c = coordinator();
        let err = c
            .submit_prevote(&val("a"), VoteHash::new([1; 32]), 15)
            .unwrap_err();
        assert!(!err.is_rejection());
    }

    #[test]
    fn tampered_vote_aborts_settlement() {
        let mut c = coordinator();
        let validators = vec![(val("a"), 10)];
        commit(&mut c, "a", "(btc:usd,100)", 1);
        c.settle_period(9, &validators).unwrap();
        reveal(&mut c, "a", "(btc:usd,100)", 12);

        let mut vote = c.store().get_vote(&val("a")).unwrap().unwrap();
        vote.exchange_rate_tuples = "(btc:usd,1)".parse().unwrap();
        c.store().put_vote(&vote).unwrap();

        let err = c.settle_period(19, &validators).unwrap_err();
        assert!(matches!(err, OracleError::InvariantViolation(_)));
        assert!(c.exchange_rate(&pair("btc:usd")).unwrap().is_none());
        // the period stays stuck until someone intervenes
        assert_eq!(c.round(0).unwrap().phase, RoundPhase::Tallying);
        assert!(c.settle_period(29, &validators).is_err());
    }

    #[test]
    fn rejected_submission_emits_event() {
        let mut c = coordinator();
        c.submit_vote(&val("a"), "(btc:usd,1)".parse().unwrap(), "salt", 3)
            .unwrap_err();
        let events = c.drain_events();
        assert!(matches!(
            events.as_slice(),
            [OracleEvent::SubmissionRejected { .. }]
        ));
    }

    #[test]
    fn vote_period_cannot_change() {
        let mut c = coordinator();
        let mut changed = params();
        changed.vote_period = 20;
        assert!(matches!(
            c.update_params(changed),
            Err(OracleError::InvalidParams(_))
        ));
        let mut band = params();
        band.reward_band_bps = 100;
        c.update_params(band).unwrap();
        assert_eq!(c.params().reward_band_bps, 100);
    }

    #[test]
    fn snapshot_restore_resumes_rounds() {
        let mut c = coordinator();
        commit(&mut c, "a", "(btc:usd,100)", 1);
        c.settle_period(9, &[(val("a"), 10)]).unwrap();
        let snapshot = c.snapshot();

        let store = NullOracleStore::with_whitelist([pair("btc:usd")]);
        let prevote = c.store().get_prevote(&val("a")).unwrap().unwrap();
        store.put_prevote(&prevote).unwrap();

        let mut restored = VotingPeriodCoordinator::restore(store, snapshot.clone()).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        reveal(&mut restored, "a", "(btc:usd,100)", 11);
        let report = restored.settle_period(19, &[(val("a"), 10)]).unwrap().unwrap();
        assert_eq!(report.published[0].exchange_rate, dec!(100));
    }

    #[test]
    fn starting_over_leftover_round_state_settles_cleanly() {
        let store = NullOracleStore::new();
        store
            .put_vote(&Vote {
                exchange_rate_tuples: "(btc:usd,1)".parse().unwrap(),
                voter: val("a"),
                salt: "salt".to_owned(),
                submit_block: 35,
                commitment: VoteHash::new([9; 32]),
            })
            .unwrap();
        store
            .put_prevote(&Prevote::new(VoteHash::new([1; 32]), val("b"), 25))
            .unwrap();
        let tuples: ExchangeRateTuples = "(btc:usd,100)".parse().unwrap();
        store
            .put_prevote(&Prevote::new(vote_hash("salt", &tuples, &val("c")), val("c"), 41))
            .unwrap();
        store.put_miss_counter(&val("a"), 3).unwrap();

        let mut c = VotingPeriodCoordinator::new(store, params(), 40).unwrap();
        assert!(c.store().get_vote(&val("a")).unwrap().is_none());
        assert!(c.store().get_prevote(&val("b")).unwrap().is_none());
        assert!(c.store().get_prevote(&val("c")).unwrap().is_some());
        assert_eq!(c.miss_counter(&val("a")).unwrap(), 0);

        let validators = vec![(val("c"), 10)];
        let first = c.settle_period(49, &validators).unwrap().unwrap();
        assert!(!first.misses_counted);
        reveal(&mut c, "c", "(btc:usd,100)", 52);
        let second = c.settle_period(59, &validators).unwrap().unwrap();
        assert_eq!(second.published[0].exchange_rate, dec!(100));
        assert_eq!(c.round(4).unwrap().phase, RoundPhase::Settled);
    }
}
