//! PriceVote oracle node: the boundary around the oracle core.
//!
//! The node:
//! - Authorizes submissions (bonded validator, delegated feeder)
//! - Drives the voting period coordinator block by block
//! - Forwards slashing decisions to the external slashing module
//! - Loads configuration, initializes logging, and records metrics

pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use error::NodeError;
pub use hooks::{NoopSlashingHook, RecordingSlashingHook, SlashingHook};
pub use logging::{init_logging, LogFormat};
pub use metrics::OracleMetrics;
pub use node::OracleNode;
