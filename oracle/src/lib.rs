//! Validator-driven price oracle.
//!
//! Validators commit to exchange rates in one voting period (a *prevote*) and
//! reveal them in the next (a *vote*). At the last block of every period the
//! coordinator tallies the revealed rates into one stake-weighted median per
//! whitelisted pair, counts misses, signals slashing at the end of each
//! slashing window, and clears the period's stores.
//!
//! ## Module overview
//!
//! - [`registry`]: pair whitelist and feeder delegation.
//! - [`commit_reveal`]: prevote/vote submission rules.
//! - [`ballot`]: per-pair ballots and the weighted median.
//! - [`tally`]: per-period tally and reward eligibility.
//! - [`slashing`]: miss counting and window-end slash decisions.
//! - [`coordinator`]: the per-period state machine driving all of the above.
//! - [`events`]: events emitted for the node to process.
//! - [`error`]: oracle error types.

pub mod ballot;
pub mod commit_reveal;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod registry;
pub mod slashing;
pub mod tally;

pub use ballot::{organize_ballots, Ballot, BallotEntry};
pub use commit_reveal::CommitRevealEngine;
pub use coordinator::{
    CoordinatorSnapshot, PeriodReport, RewardClaim, RoundPhase, VotingPeriodCoordinator,
    VotingRound,
};
pub use error::OracleError;
pub use events::OracleEvent;
pub use registry::{FeederRegistry, PairRegistry};
pub use slashing::{MissCounterPolicy, MissUpdate, SlashDecision, WindowBoundary};
pub use tally::{PairTally, TallyEngine, TallyOutcome, ValidatorClaim};
