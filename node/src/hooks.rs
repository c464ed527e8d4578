//! Outbound hooks to modules outside the oracle.

use std::sync::Mutex;

use pricevote_oracle::SlashDecision;

/// Receives validators flagged at the end of a slashing window. Stake
/// reduction itself happens in the external slashing module.
pub trait SlashingHook: Send {
    fn slash(&self, decision: &SlashDecision);
}

/// Drops every decision; used when no slashing module is wired in.
pub struct NoopSlashingHook;

impl SlashingHook for NoopSlashingHook {
    fn slash(&self, _decision: &SlashDecision) {}
}

/// Keeps every forwarded decision in memory.
#[derive(Default)]
pub struct RecordingSlashingHook {
    decisions: Mutex<Vec<SlashDecision>>,
}

impl RecordingSlashingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> Vec<SlashDecision> {
        self.decisions.lock().unwrap().clone()
    }
}

impl SlashingHook for RecordingSlashingHook {
    fn slash(&self, decision: &SlashDecision) {
        self.decisions.lock().unwrap().push(decision.clone());
    }
}

impl<T: SlashingHook + Sync> SlashingHook for std::sync::Arc<T> {
    fn slash(&self, decision: &SlashDecision) {
        (**self).slash(decision)
    }
}
