//! The oracle node: authorizes submissions and drives the coordinator one
//! block at a time.

use std::sync::Arc;
use std::time::Instant;

use pricevote_oracle::{
    FeederRegistry, OracleError, OracleEvent, PairRegistry, PeriodReport,
    VotingPeriodCoordinator,
};
use pricevote_store::{OracleStore, ValidatorSet};
use pricevote_types::{
    AccountAddress, AggregatedExchangeRate, AssetPair, ExchangeRateTuples, OracleParams, Prevote,
    ValidatorAddress, Vote, VoteHash,
};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::hooks::{NoopSlashingHook, SlashingHook};
use crate::metrics::OracleMetrics;
use crate::tracing_spans::{settle_span, submission_span};

pub struct OracleNode<S: OracleStore, V: ValidatorSet> {
    config: NodeConfig,
    coordinator: VotingPeriodCoordinator<S>,
    validators: V,
    slashing: Box<dyn SlashingHook>,
    metrics: Arc<OracleMetrics>,
    /// Height of the block currently being processed.
    height: u64,
}

impl<S: OracleStore, V: ValidatorSet> OracleNode<S, V> {
    pub fn new(config: NodeConfig, store: S, validators: V) -> Result<Self, NodeError> {
        config.validate()?;
        let coordinator =
            VotingPeriodCoordinator::new(store, config.params.clone(), config.start_height)?;
        let node = Self {
            height: config.start_height,
            config,
            coordinator,
            validators,
            slashing: Box::new(NoopSlashingHook),
            metrics: Arc::new(OracleMetrics::new()),
        };
        node.refresh_gauges()?;
        Ok(node)
    }

    /// Forward window-end slash flags to `hook` instead of dropping them.
    pub fn with_slashing_hook(mut self, hook: impl SlashingHook + 'static) -> Self {
        self.slashing = Box::new(hook);
        self
    }

    // ── Submissions ─────────────────────────────────────────────────────

    /// Prevote sent by `feeder` on behalf of `validator`.
    pub fn handle_prevote(
        &mut self,
        feeder: &AccountAddress,
        validator: &ValidatorAddress,
        hash: VoteHash,
    ) -> Result<Prevote, NodeError> {
        let _span = submission_span("prevote", validator.as_str(), self.height).entered();
        let result = self.authorize(feeder, validator).and_then(|()| {
            Ok(self
                .coordinator
                .submit_prevote(validator, hash, self.height)?)
        });
        self.count_submission(&result, true);
        result
    }

    /// Vote (reveal) sent by `feeder` on behalf of `validator`.
    pub fn handle_vote(
        &mut self,
        feeder: &AccountAddress,
        validator: &ValidatorAddress,
        tuples: ExchangeRateTuples,
        salt: &str,
    ) -> Result<Vote, NodeError> {
        let _span = submission_span("vote", validator.as_str(), self.height).entered();
        let result = self.authorize(feeder, validator).and_then(|()| {
            Ok(self
                .coordinator
                .submit_vote(validator, tuples, salt, self.height)?)
        });
        self.count_submission(&result, false);
        result
    }

    /// Delegate `validator`'s feeding rights to `feeder`. Only the
    /// validator's own account may do this.
    pub fn handle_delegate_feeder(
        &mut self,
        sender: &AccountAddress,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<(), NodeError> {
        let _span = submission_span("delegate_feeder", validator.as_str(), self.height).entered();
        let result = self.delegate(sender, validator, feeder);
        match &result {
            Ok(()) => tracing::info!(validator = %validator, feeder = %feeder, "feeder delegated"),
            Err(e) => {
                tracing::debug!(validator = %validator, error = %e, "delegation rejected");
                if e.is_rejection() {
                    self.metrics.submissions_rejected.inc();
                }
            }
        }
        result
    }

    fn delegate(
        &self,
        sender: &AccountAddress,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<(), NodeError> {
        self.ensure_bonded(validator)?;
        if *sender != validator.account() {
            return Err(OracleError::FeederNotAuthorized {
                feeder: sender.to_string(),
                validator: validator.to_string(),
            }
            .into());
        }
        FeederRegistry.delegate_feeder(self.coordinator.store(), validator, feeder)?;
        Ok(())
    }

    fn authorize(
        &self,
        feeder: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<(), NodeError> {
        self.ensure_bonded(validator)?;
        if !FeederRegistry.is_authorized(self.coordinator.store(), validator, feeder)? {
            tracing::debug!(validator = %validator, feeder = %feeder, "feeder not authorized");
            return Err(OracleError::FeederNotAuthorized {
                feeder: feeder.to_string(),
                validator: validator.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn ensure_bonded(&self, validator: &ValidatorAddress) -> Result<(), NodeError> {
        if self.validators.power_of(validator) == 0 {
            tracing::debug!(validator = %validator, "validator not bonded");
            return Err(OracleError::ValidatorNotBonded(validator.to_string()).into());
        }
        Ok(())
    }

    fn count_submission<T>(&self, result: &Result<T, NodeError>, prevote: bool) {
        match result {
            Ok(_) if prevote => self.metrics.prevotes_accepted.inc(),
            Ok(_) => self.metrics.votes_accepted.inc(),
            Err(e) if e.is_rejection() => self.metrics.submissions_rejected.inc(),
            Err(e) => tracing::error!(error = %e, "submission failed"),
        }
    }

    // ── Block driver ────────────────────────────────────────────────────

    /// Finish the current block: settle its period when it is the period's
    /// last block, then move to the next height.
    pub fn end_block(&mut self) -> Result<Option<PeriodReport>, NodeError> {
        let height = self.height;
        let result = self.settle(height);
        self.height = height.saturating_add(1);
        self.metrics
            .current_period
            .set(self.coordinator.params().period_of(self.height) as i64);
        result
    }

    /// Skip to the last block of the current period and end it.
    pub fn finish_period(&mut self) -> Result<Option<PeriodReport>, NodeError> {
        let vote_period = self.coordinator.params().vote_period;
        let period = self.coordinator.params().period_of(self.height);
        self.height = (period + 1) * vote_period - 1;
        self.end_block()
    }

    fn settle(&mut self, height: u64) -> Result<Option<PeriodReport>, NodeError> {
        if !self.coordinator.params().is_period_last_block(height) {
            return Ok(None);
        }
        let period = self.coordinator.params().period_of(height);
        let _span = settle_span(period, height).entered();
        let started = Instant::now();

        let validators = self.validators.bonded_validators();
        let Some(report) = self.coordinator.settle_period(height, &validators)? else {
            return Ok(None);
        };

        self.metrics.periods_settled.inc();
        self.metrics
            .published_pairs
            .set(report.published.len() as i64);
        self.metrics
            .misses_recorded
            .inc_by(report.missed.len() as u64);
        for decision in report.flagged() {
            tracing::warn!(
                validator = %decision.validator,
                miss_count = decision.miss_count,
                slash_fraction_bps = decision.slash_fraction_bps,
                "forwarding slash decision"
            );
            self.slashing.slash(decision);
            self.metrics.slash_flags.inc();
        }
        self.metrics
            .settle_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        Ok(Some(report))
    }

    // ── Parameters ──────────────────────────────────────────────────────

    pub fn apply_whitelist(&mut self, pairs: &[AssetPair]) -> Result<bool, NodeError> {
        let changed = self.coordinator.apply_whitelist(pairs)?;
        self.config.params.whitelist = pairs.to_vec();
        self.refresh_gauges()?;
        Ok(changed)
    }

    pub fn update_params(&mut self, params: OracleParams) -> Result<(), NodeError> {
        self.coordinator.update_params(params.clone())?;
        self.config.params = params;
        self.refresh_gauges()?;
        Ok(())
    }

    fn refresh_gauges(&self) -> Result<(), NodeError> {
        let pairs = PairRegistry.active_pairs(self.coordinator.store())?;
        self.metrics.whitelisted_pairs.set(pairs.len() as i64);
        self.metrics
            .current_period
            .set(self.coordinator.params().period_of(self.height) as i64);
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn current_period(&self) -> u64 {
        self.coordinator.params().period_of(self.height)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &VotingPeriodCoordinator<S> {
        &self.coordinator
    }

    pub fn validators(&self) -> &V {
        &self.validators
    }

    pub fn metrics(&self) -> Arc<OracleMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn exchange_rate(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<AggregatedExchangeRate>, NodeError> {
        Ok(self.coordinator.exchange_rate(pair)?)
    }

    pub fn authorized_feeder(
        &self,
        validator: &ValidatorAddress,
    ) -> Result<AccountAddress, NodeError> {
        Ok(FeederRegistry.authorized_feeder(self.coordinator.store(), validator)?)
    }

    pub fn miss_counter(&self, validator: &ValidatorAddress) -> Result<u64, NodeError> {
        Ok(self.coordinator.miss_counter(validator)?)
    }

    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        self.coordinator.drain_events()
    }
}
