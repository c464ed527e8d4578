//! PriceVote daemon: entry point for running the oracle node.

mod scenario;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use pricevote_node::{init_logging, NodeConfig, OracleNode};
use pricevote_nullables::{NullOracleStore, NullValidatorSet};
use pricevote_store::OracleStore;
use pricevote_store_lmdb::LmdbEnvironment;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "pricevote-daemon", about = "PriceVote oracle daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "PRICEVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level filter, e.g. "info" or "info,pricevote_oracle=debug".
    #[arg(long, global = true, env = "PRICEVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "PRICEVOTE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario file and print each settled period as JSON.
    Replay {
        /// Scenario TOML file.
        #[arg(long)]
        scenario: PathBuf,

        /// LMDB data directory. State is kept in memory when unset.
        #[arg(long, env = "PRICEVOTE_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Print Prometheus metrics to stderr when the replay finishes.
        #[arg(long, env = "PRICEVOTE_ENABLE_METRICS")]
        metrics: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(&path.to_string_lossy())
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    match cli.command {
        Command::Config => {
            let text = config.to_toml_string()?;
            print!("{text}");
        }
        Command::Replay {
            scenario,
            data_dir,
            metrics,
        } => {
            if data_dir.is_some() {
                config.data_dir = data_dir;
            }
            config.enable_metrics |= metrics;
            config.validate()?;
            init_logging(config.log_format()?, &config.log_level);

            let text = std::fs::read_to_string(&scenario)
                .with_context(|| format!("reading scenario {}", scenario.display()))?;
            let scenario = Scenario::from_toml_str(&text)?;
            let validators = scenario.validator_set()?;

            match config.data_dir.clone() {
                Some(dir) => {
                    let env = open_environment(&dir, config.map_size_bytes())?;
                    run(config, env.oracle_store(), validators, &scenario)?;
                }
                None => run(config, NullOracleStore::new(), validators, &scenario)?,
            }
        }
    }

    Ok(())
}

fn open_environment(dir: &Path, map_size: usize) -> anyhow::Result<LmdbEnvironment> {
    tracing::info!(path = %dir.display(), "opening LMDB environment");
    LmdbEnvironment::open(dir, map_size)
        .with_context(|| format!("opening LMDB environment at {}", dir.display()))
}

fn run<S: OracleStore>(
    config: NodeConfig,
    store: S,
    validators: NullValidatorSet,
    scenario: &Scenario,
) -> anyhow::Result<()> {
    let enable_metrics = config.enable_metrics;
    let mut node = OracleNode::new(config, store, validators)?;
    tracing::info!(
        height = node.height(),
        rounds = scenario.rounds.len(),
        validators = scenario.validators.len(),
        "replaying scenario"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let settled = scenario::replay(&mut node, scenario, &mut out)?;
    out.flush()?;

    tracing::info!(settled, "scenario replayed");
    if enable_metrics {
        eprint!("{}", node.metrics().encode());
    }
    Ok(())
}
