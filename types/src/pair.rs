//! Asset pair identifiers (`base:quote`).

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered pair of asset denominations, stored in canonical `base:quote` form.
///
/// Immutable once constructed. Ordering follows the canonical string, which is
/// also the iteration order of every per-pair table.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPair(String);

impl AssetPair {
    pub const SEPARATOR: char = ':';

    /// Build a pair from its two denominations.
    pub fn new(base: &str, quote: &str) -> Result<Self, TypesError> {
        format!("{base}{}{quote}", Self::SEPARATOR).parse()
    }

    /// Parse a pair, panicking on malformed input. Intended for constants and tests.
    ///
    /// # Panics
    /// Panics if `s` is not a valid `base:quote` string.
    pub fn must_parse(s: &str) -> Self {
        match s.parse() {
            Ok(pair) => pair,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn base(&self) -> &str {
        self.split().0
    }

    pub fn quote(&self) -> &str {
        self.split().1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        // Construction guarantees exactly one separator.
        self.0
            .split_once(Self::SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl FromStr for AssetPair {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid_denom = |d: &str| {
            !d.is_empty()
                && d.chars().all(|c| {
                    !c.is_whitespace() && !matches!(c, ':' | ',' | '(' | ')' | '|')
                })
        };
        match s.split_once(Self::SEPARATOR) {
            Some((base, quote)) if valid_denom(base) && valid_denom(quote) => {
                Ok(Self(s.to_string()))
            }
            _ => Err(TypesError::InvalidPair(s.to_string())),
        }
    }
}

impl TryFrom<String> for AssetPair {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetPair> for String {
    fn from(pair: AssetPair) -> Self {
        pair.0
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_and_quote() {
        let pair: AssetPair = "btc:usd".parse().unwrap();
        assert_eq!(pair.base(), "btc");
        assert_eq!(pair.quote(), "usd");
        assert_eq!(pair.to_string(), "btc:usd");
    }

    #[test]
    fn new_matches_parse() {
        assert_eq!(AssetPair::new("eth", "usd").unwrap(), AssetPair::must_parse("eth:usd"));
    }

    #[test]
    fn rejects_malformed_pairs() {
        for bad in ["", "btc", ":usd", "btc:", "btc:usd:eur", "b tc:usd", "btc,x:usd", "(btc:usd)"] {
            assert!(bad.parse::<AssetPair>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn ordering_follows_canonical_string() {
        let mut pairs = vec![
            AssetPair::must_parse("eth:usd"),
            AssetPair::must_parse("btc:usd"),
            AssetPair::must_parse("btc:eur"),
        ];
        pairs.sort();
        let names: Vec<_> = pairs.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["btc:eur", "btc:usd", "eth:usd"]);
    }

    #[test]
    fn deserialize_validates() {
        let bytes = bincode::serialize(&"nocolon".to_string()).unwrap();
        assert!(bincode::deserialize::<AssetPair>(&bytes).is_err());

        let bytes = bincode::serialize(&"btc:usd".to_string()).unwrap();
        let pair: AssetPair = bincode::deserialize(&bytes).unwrap();
        assert_eq!(pair, AssetPair::must_parse("btc:usd"));
    }
}
