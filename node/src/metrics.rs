//! Prometheus metrics for the oracle node.
//!
//! [`OracleMetrics`] owns a dedicated [`Registry`]; [`OracleMetrics::encode`]
//! renders it in the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

pub struct OracleMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub prevotes_accepted: IntCounter,
    pub votes_accepted: IntCounter,
    /// Submissions refused at the boundary or by the commit/reveal rules.
    pub submissions_rejected: IntCounter,
    pub periods_settled: IntCounter,
    pub misses_recorded: IntCounter,
    pub slash_flags: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub whitelisted_pairs: IntGauge,
    /// Pairs that received a new rate in the last settled period.
    pub published_pairs: IntGauge,
    pub current_period: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent settling one period, in milliseconds.
    pub settle_time_ms: Histogram,
}

impl OracleMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let prevotes_accepted = register_int_counter_with_registry!(
            Opts::new("pricevote_prevotes_accepted_total", "Total prevotes accepted"),
            registry
        )
        .expect("failed to register prevotes_accepted counter");

        let votes_accepted = register_int_counter_with_registry!(
            Opts::new("pricevote_votes_accepted_total", "Total votes accepted"),
            registry
        )
        .expect("failed to register votes_accepted counter");

        let submissions_rejected = register_int_counter_with_registry!(
            Opts::new(
                "pricevote_submissions_rejected_total",
                "Total prevote, vote and delegation submissions rejected"
            ),
            registry
        )
        .expect("failed to register submissions_rejected counter");

        let periods_settled = register_int_counter_with_registry!(
            Opts::new("pricevote_periods_settled_total", "Total voting periods settled"),
            registry
        )
        .expect("failed to register periods_settled counter");

        let misses_recorded = register_int_counter_with_registry!(
            Opts::new(
                "pricevote_misses_recorded_total",
                "Total validator misses recorded"
            ),
            registry
        )
        .expect("failed to register misses_recorded counter");

        let slash_flags = register_int_counter_with_registry!(
            Opts::new(
                "pricevote_slash_flags_total",
                "Total validators flagged for slashing"
            ),
            registry
        )
        .expect("failed to register slash_flags counter");

        let whitelisted_pairs = register_int_gauge_with_registry!(
            Opts::new("pricevote_whitelisted_pairs", "Current number of whitelisted pairs"),
            registry
        )
        .expect("failed to register whitelisted_pairs gauge");

        let published_pairs = register_int_gauge_with_registry!(
            Opts::new(
                "pricevote_published_pairs",
                "Pairs published in the last settled period"
            ),
            registry
        )
        .expect("failed to register published_pairs gauge");

        let current_period = register_int_gauge_with_registry!(
            Opts::new("pricevote_current_period", "Current voting period"),
            registry
        )
        .expect("failed to register current_period gauge");

        let settle_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "pricevote_settle_time_ms",
                "Time spent settling a voting period in milliseconds"
            )
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0]),
            registry
        )
        .expect("failed to register settle_time_ms histogram");

        Self {
            registry,
            prevotes_accepted,
            votes_accepted,
            submissions_rejected,
            periods_settled,
            misses_recorded,
            slash_flags,
            whitelisted_pairs,
            published_pairs,
            current_period,
            settle_time_ms,
        }
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for OracleMetrics {
    fn default() -> Self {
        Self::new()
    }
}
