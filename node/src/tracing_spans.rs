//! Span constructors for oracle node operations, so settlement and
//! submission logs carry consistent fields.

use tracing::{debug_span, info_span, Span};

/// Span covering the settlement of one voting period.
pub fn settle_span(period: u64, height: u64) -> Span {
    info_span!("settle_period", period, height)
}

/// Span covering one prevote, vote, or delegation submission.
pub fn submission_span(kind: &'static str, validator: &str, height: u64) -> Span {
    debug_span!("submission", kind, validator = %validator, height)
}
