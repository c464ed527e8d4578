//! Scenario files: a validator set and rounds of reports, replayed through
//! an [`OracleNode`] acting as every feeder.
//!
//! ```toml
//! secret = "demo"
//!
//! [[validators]]
//! address = "pvvaloper_alice"
//! power = 60
//! feeder = "pv_alice_bot"
//!
//! [[rounds]]
//! reports = { pvvaloper_alice = "(btc:usd,100)" }
//! ```
//!
//! Reports of round `r` are committed in period `r` and revealed in period
//! `r + 1`, so a scenario with `n` rounds settles `n + 1` periods.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{bail, Context};
use serde::Deserialize;

use pricevote_crypto::{derive_salt, vote_hash};
use pricevote_node::OracleNode;
use pricevote_nullables::NullValidatorSet;
use pricevote_store::OracleStore;
use pricevote_types::{AccountAddress, ExchangeRateTuples, ValidatorAddress};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Feeder secret the per-period salts are derived from.
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default)]
    pub validators: Vec<ScenarioValidator>,
    #[serde(default)]
    pub rounds: Vec<ScenarioRound>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioValidator {
    pub address: String,
    pub power: u64,
    /// Delegated feeder account; the validator's own account when unset.
    #[serde(default)]
    pub feeder: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioRound {
    /// Validator address → exchange rate tuples text.
    #[serde(default)]
    pub reports: BTreeMap<String, String>,
}

fn default_secret() -> String {
    "pricevote".to_string()
}

/// A scenario with every address and report parsed.
struct Prepared {
    validators: Vec<(ValidatorAddress, u128, AccountAddress)>,
    rounds: Vec<Vec<(ValidatorAddress, ExchangeRateTuples)>>,
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid scenario file")
    }

    pub fn validator_set(&self) -> anyhow::Result<NullValidatorSet> {
        Ok(NullValidatorSet::with_powers(
            self.prepare()?
                .validators
                .into_iter()
                .map(|(validator, power, _)| (validator, power)),
        ))
    }

    fn prepare(&self) -> anyhow::Result<Prepared> {
        let mut validators = Vec::with_capacity(self.validators.len());
        for v in &self.validators {
            let address: ValidatorAddress = v
                .address
                .parse()
                .with_context(|| format!("validator {}", v.address))?;
            let feeder = match &v.feeder {
                Some(feeder) => feeder
                    .parse()
                    .with_context(|| format!("feeder of {}", v.address))?,
                None => address.account(),
            };
            validators.push((address, u128::from(v.power), feeder));
        }

        let mut rounds = Vec::with_capacity(self.rounds.len());
        for (index, round) in self.rounds.iter().enumerate() {
            let mut reports = Vec::with_capacity(round.reports.len());
            for (voter, text) in &round.reports {
                let voter: ValidatorAddress = voter
                    .parse()
                    .with_context(|| format!("round {index}: reporter {voter}"))?;
                if !validators.iter().any(|(v, _, _)| *v == voter) {
                    bail!("round {index}: {voter} is not a scenario validator");
                }
                let tuples: ExchangeRateTuples = text
                    .parse()
                    .with_context(|| format!("round {index}: report of {voter}"))?;
                reports.push((voter, tuples));
            }
            rounds.push(reports);
        }
        Ok(Prepared { validators, rounds })
    }
}

/// Replay `scenario` through `node`, writing one JSON period report per line.
/// Returns the number of settled periods.
pub fn replay<S: OracleStore>(
    node: &mut OracleNode<S, NullValidatorSet>,
    scenario: &Scenario,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let prepared = scenario.prepare()?;
    let secret = scenario.secret.as_bytes();
    let feeders: BTreeMap<&ValidatorAddress, &AccountAddress> = prepared
        .validators
        .iter()
        .map(|(v, _, feeder)| (v, feeder))
        .collect();

    for (validator, _, feeder) in &prepared.validators {
        if *feeder != validator.account() {
            node.handle_delegate_feeder(&validator.account(), validator, feeder)
                .with_context(|| format!("delegating feeder of {validator}"))?;
        }
    }

    let mut settled = 0;
    let mut committed: &[(ValidatorAddress, ExchangeRateTuples)] = &[];
    for round in 0..=prepared.rounds.len() {
        let period = node.current_period();

        for (voter, tuples) in committed {
            let salt = derive_salt(secret, voter, period.saturating_sub(1));
            let result = node.handle_vote(feeders[voter], voter, tuples.clone(), &salt);
            skip_rejection(result, voter, "vote")?;
        }

        let reports = prepared.rounds.get(round).map(Vec::as_slice).unwrap_or(&[]);
        for (voter, tuples) in reports {
            let salt = derive_salt(secret, voter, period);
            let hash = vote_hash(&salt, tuples, voter);
            let result = node.handle_prevote(feeders[voter], voter, hash);
            skip_rejection(result, voter, "prevote")?;
        }
        committed = reports;

        if let Some(report) = node.finish_period()? {
            serde_json::to_writer(&mut *out, &report).context("writing period report")?;
            writeln!(out)?;
            settled += 1;
        }
        for event in node.drain_events() {
            tracing::debug!(?event, "oracle event");
        }
    }
    Ok(settled)
}

/// Rejected submissions are logged and skipped; anything else aborts.
fn skip_rejection<T>(
    result: Result<T, pricevote_node::NodeError>,
    voter: &ValidatorAddress,
    kind: &str,
) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_rejection() => {
            tracing::warn!(voter = %voter, kind, error = %e, "submission rejected");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("{kind} of {voter}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricevote_node::NodeConfig;
    use pricevote_nullables::NullOracleStore;
    use pricevote_oracle::PeriodReport;
    use pricevote_types::{AssetPair, OracleParams};

    const SCENARIO: &str = r#"
        secret = "test"

        [[validators]]
        address = "pvvaloper_alice"
        power = 60

        [[validators]]
        address = "pvvaloper_bob"
        power = 40
        feeder = "pv_bob_bot"

        [[rounds]]
        reports = { pvvaloper_alice = "(btc:usd,100)", pvvaloper_bob = "(btc:usd,110)" }

        [[rounds]]
        reports = { pvvaloper_alice = "(btc:usd,102)" }
    "#;

    fn node(scenario: &Scenario) -> OracleNode<NullOracleStore, NullValidatorSet> {
        let config = NodeConfig {
            params: OracleParams {
                vote_period: 5,
                whitelist: vec![AssetPair::must_parse("btc:usd")],
                ..Default::default()
            },
            ..Default::default()
        };
        OracleNode::new(
            config,
            NullOracleStore::new(),
            scenario.validator_set().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn replay_prints_one_report_per_period() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let mut node = node(&scenario);
        let mut out = Vec::new();
        let settled = replay(&mut node, &scenario, &mut out).unwrap();
        assert_eq!(settled, 3);

        let reports: Vec<PeriodReport> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(reports[0].published.is_empty());
        assert_eq!(reports[1].published[0].exchange_rate.to_string(), "100");
        assert_eq!(reports[2].published[0].exchange_rate.to_string(), "102");
        // bob reported only in the first round
        assert_eq!(reports[2].missed.len(), 1);
    }

    #[test]
    fn unknown_reporter_is_an_error() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[rounds]]
            reports = { pvvaloper_ghost = "(btc:usd,1)" }
            "#,
        )
        .unwrap();
        assert!(scenario.prepare().is_err());
    }
}
