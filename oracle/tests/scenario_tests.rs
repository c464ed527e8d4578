//! End-to-end voting scenarios driven through the coordinator.

use pricevote_crypto::vote_hash;
use pricevote_nullables::{NullBlockClock, NullOracleStore, NullValidatorSet};
use pricevote_oracle::{OracleError, OracleEvent, PeriodReport, VotingPeriodCoordinator};
use pricevote_store::{ExchangeRateStore, ValidatorSet};
use pricevote_types::{
    AggregatedExchangeRate, AssetPair, ExchangeRateTuples, OracleParams, ValidatorAddress,
};
use rust_decimal_macros::dec;

const VP: u64 = 10;

fn val(name: &str) -> ValidatorAddress {
    ValidatorAddress::new(format!("pvvaloper_{name}"))
}

fn pair(s: &str) -> AssetPair {
    AssetPair::must_parse(s)
}

struct Harness {
    coordinator: VotingPeriodCoordinator<NullOracleStore>,
    clock: NullBlockClock,
    validators: NullValidatorSet,
}

impl Harness {
    fn new(params: OracleParams, powers: &[(&str, u128)]) -> Self {
        let coordinator = VotingPeriodCoordinator::new(NullOracleStore::new(), params, 0).unwrap();
        let validators =
            NullValidatorSet::with_powers(powers.iter().map(|(name, power)| (val(name), *power)));
        Self {
            coordinator,
            clock: NullBlockClock::new(0),
            validators,
        }
    }

    fn period(&self) -> u64 {
        self.clock.height() / VP
    }

    fn commit(&mut self, who: &str, text: &str) {
        let tuples: ExchangeRateTuples = text.parse().unwrap();
        let salt = format!("p{}", self.period());
        let hash = vote_hash(&salt, &tuples, &val(who));
        self.coordinator
            .submit_prevote(&val(who), hash, self.clock.height())
            .unwrap();
    }

    fn reveal(&mut self, who: &str, text: &str) -> Result<(), OracleError> {
        let salt = format!("p{}", self.period() - 1);
        self.coordinator
            .submit_vote(&val(who), text.parse().unwrap(), &salt, self.clock.height())
            .map(|_| ())
    }

    /// Jump to the last block of the current period and settle it.
    fn settle(&mut self) -> PeriodReport {
        let period = self.period();
        let last = self.clock.end_of_period(period, VP);
        let report = self
            .coordinator
            .settle_period(last, &self.validators.bonded_validators())
            .unwrap()
            .expect("boundary settles");
        self.clock.advance(1);
        report
    }
}

fn params(pairs: &[&str]) -> OracleParams {
    OracleParams {
        vote_period: VP,
        reward_band_bps: 500,
        slash_window: 5,
        max_miss_rate_bps: 5_000,
        whitelist: pairs.iter().map(|p| pair(p)).collect(),
        ..Default::default()
    }
}

#[test]
fn weighted_median_sixty_forty() {
    let mut h = Harness::new(params(&["btc:usd"]), &[("a", 60), ("b", 40)]);
    h.commit("a", "(btc:usd,100)");
    h.commit("b", "(btc:usd,110)");
    h.settle();

    h.reveal("a", "(btc:usd,100)").unwrap();
    h.reveal("b", "(btc:usd,110)").unwrap();
    let report = h.settle();

    assert_eq!(report.published[0].exchange_rate, dec!(100));
    let b = report.rewards.iter().find(|r| r.validator == val("b")).unwrap();
    assert!(!b.reward_eligible);
    // outside the band, but still not a miss
    assert!(report.missed.is_empty());
}

#[test]
fn unreported_pair_keeps_previous_rate() {
    let mut h = Harness::new(params(&["btc:usd", "eth:usd"]), &[("a", 10)]);
    h.commit("a", "(btc:usd,100)|(eth:usd,2000)");
    h.settle();
    h.reveal("a", "(btc:usd,100)|(eth:usd,2000)").unwrap();
    h.commit("a", "(btc:usd,101)|(eth:usd,0)");
    let first = h.settle();
    assert_eq!(first.published.len(), 2);

    h.reveal("a", "(btc:usd,101)|(eth:usd,0)").unwrap();
    let second = h.settle();

    assert_eq!(second.unchanged_pairs, vec![pair("eth:usd")]);
    let eth = h
        .coordinator
        .store()
        .get_exchange_rate(&pair("eth:usd"))
        .unwrap()
        .unwrap();
    assert_eq!(
        eth,
        AggregatedExchangeRate {
            pair: pair("eth:usd"),
            exchange_rate: dec!(2000),
            block_height: first.block_height,
            period: first.period,
        }
    );
}

#[test]
fn four_misses_in_window_of_five_flags_slash_and_resets() {
    let mut h = Harness::new(params(&["btc:usd"]), &[("a", 50), ("c", 50)]);
    // genesis period: no reveal round yet, so no misses are counted
    h.commit("a", "(btc:usd,100)");
    h.commit("c", "(btc:usd,100)");
    let genesis = h.settle();
    assert!(!genesis.misses_counted);

    // periods 1..=4: c never reveals
    for period in 1..=4u64 {
        h.reveal("a", "(btc:usd,100)").unwrap();
        h.commit("a", "(btc:usd,100)");
        let report = h.settle();
        assert!(report.slash_decisions.is_none() || period == 4);
        if period == 4 {
            let flagged: Vec<_> = report.flagged().map(|d| d.validator.clone()).collect();
            assert_eq!(flagged, vec![val("c")]);
        }
    }
    assert_eq!(h.coordinator.miss_counter(&val("c")).unwrap(), 0);

    let events = h.coordinator.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        OracleEvent::SlashFlagged { validator, miss_count: 4, .. } if *validator == val("c")
    )));
}

#[test]
fn reveal_in_commit_period_is_rejected() {
    let mut h = Harness::new(params(&["btc:usd"]), &[("a", 10)]);
    h.commit("a", "(btc:usd,100)");
    let tuples: ExchangeRateTuples = "(btc:usd,100)".parse().unwrap();
    let err = h
        .coordinator
        .submit_vote(&val("a"), tuples, "p0", h.clock.height())
        .unwrap_err();
    assert!(matches!(err, OracleError::NoMatchingPrevote { .. }));
}

#[test]
fn removed_pair_is_ignored_but_rate_kept() {
    let mut h = Harness::new(params(&["btc:usd", "eth:usd"]), &[("a", 10)]);
    h.commit("a", "(btc:usd,100)|(eth:usd,2000)");
    h.settle();
    h.reveal("a", "(btc:usd,100)|(eth:usd,2000)").unwrap();
    h.commit("a", "(btc:usd,100)");
    h.settle();

    h.coordinator.apply_whitelist(&[pair("btc:usd")]).unwrap();
    h.reveal("a", "(btc:usd,100)").unwrap();
    let report = h.settle();

    assert!(report.unchanged_pairs.is_empty());
    assert_eq!(report.published.len(), 1);
    assert!(h
        .coordinator
        .exchange_rate(&pair("eth:usd"))
        .unwrap()
        .is_some());
}

#[test]
fn empty_whitelist_settles_without_misses() {
    let mut h = Harness::new(params(&[]), &[("a", 10)]);
    h.settle();
    let report = h.settle();
    assert!(report.misses_counted);
    assert!(report.missed.is_empty());
    assert!(report.published.is_empty());
}
