//! Exchange-rate tuples revealed by a vote.
//!
//! The canonical text form is `(base:quote,rate)|(base:quote,rate)`. Commitment
//! hashes are computed over this text, so parsing and displaying a tuple set
//! must reproduce the input exactly; `Decimal` keeps the scale it was parsed
//! with (`100.0` stays `100.0`).

use crate::error::TypesError;
use crate::pair::AssetPair;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One pair's reported rate. A zero rate is an abstention for that pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateTuple {
    pub pair: AssetPair,
    pub exchange_rate: Decimal,
}

impl ExchangeRateTuple {
    pub fn new(pair: AssetPair, exchange_rate: Decimal) -> Self {
        Self {
            pair,
            exchange_rate,
        }
    }
}

impl fmt::Display for ExchangeRateTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.pair, self.exchange_rate)
    }
}

impl FromStr for ExchangeRateTuple {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| TypesError::InvalidTuples(format!("'{s}' is not parenthesised")))?;
        let (pair, rate) = inner
            .split_once(',')
            .ok_or_else(|| TypesError::InvalidTuples(format!("'{s}' has no rate")))?;
        let exchange_rate =
            Decimal::from_str(rate).map_err(|_| TypesError::InvalidDecimal(rate.to_string()))?;
        Ok(Self {
            pair: pair.parse()?,
            exchange_rate,
        })
    }
}

/// The ordered sequence of tuples carried by one vote, exactly as submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateTuples(Vec<ExchangeRateTuple>);

impl ExchangeRateTuples {
    pub const SEPARATOR: char = '|';

    pub fn new(tuples: Vec<ExchangeRateTuple>) -> Self {
        Self(tuples)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeRateTuple> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapse the sequence to one rate per pair. A later tuple for the same
    /// pair replaces an earlier one.
    pub fn latest_by_pair(&self) -> BTreeMap<&AssetPair, Decimal> {
        self.0
            .iter()
            .map(|t| (&t.pair, t.exchange_rate))
            .collect()
    }
}

impl fmt::Display for ExchangeRateTuples {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tuple) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", Self::SEPARATOR)?;
            }
            write!(f, "{tuple}")?;
        }
        Ok(())
    }
}

impl FromStr for ExchangeRateTuples {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TypesError::InvalidTuples("empty tuple list".into()));
        }
        s.split(Self::SEPARATOR)
            .map(ExchangeRateTuple::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl FromIterator<ExchangeRateTuple> for ExchangeRateTuples {
    fn from_iter<I: IntoIterator<Item = ExchangeRateTuple>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn canonical_text_is_reproduced() {
        let raw = "(btc:usd,100.0)|(eth:usd,2000)|(atom:usd,0)";
        let tuples: ExchangeRateTuples = raw.parse().unwrap();
        assert_eq!(tuples.len(), 3);
        assert_eq!(tuples.to_string(), raw);
    }

    #[test]
    fn parses_negative_rates_for_later_validation() {
        let tuples: ExchangeRateTuples = "(btc:usd,-1.5)".parse().unwrap();
        let first = tuples.iter().next().unwrap();
        assert_eq!(first.exchange_rate, dec!(-1.5));
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", "btc:usd,1", "(btc:usd)", "(btc:usd,abc)", "(btcusd,1)", "(btc:usd,1)|"] {
            assert!(bad.parse::<ExchangeRateTuples>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn latest_by_pair_keeps_last_tuple() {
        let tuples: ExchangeRateTuples = "(btc:usd,100)|(eth:usd,5)|(btc:usd,101)".parse().unwrap();
        let latest = tuples.latest_by_pair();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&AssetPair::must_parse("btc:usd")], dec!(101));
        assert_eq!(latest[&AssetPair::must_parse("eth:usd")], dec!(5));
    }
}
