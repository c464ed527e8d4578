//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use pricevote_types::OracleParams;

use crate::{LogFormat, NodeError};

/// Configuration for an oracle node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// LMDB data directory. State is kept in memory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mib")]
    pub map_size_mib: usize,

    /// Block height the node starts at.
    #[serde(default)]
    pub start_height: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect and print Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Oracle parameters, including the initial pair whitelist.
    #[serde(default)]
    pub params: OracleParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_map_size_mib() -> usize {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        self.log_format()?;
        if self.map_size_mib == 0 {
            return Err(NodeError::Config("map_size_mib must be positive".into()));
        }
        self.params.validate().map_err(NodeError::Config)
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mib.saturating_mul(1024 * 1024)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            map_size_mib: default_map_size_mib(),
            start_height: 0,
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
            params: OracleParams::default(),
        }
    }
}
