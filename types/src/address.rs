//! Validator operator and account addresses.
//!
//! A validator operator address (`pvvaloper_...`) and the account address that
//! shares its identity (`pv_...`) differ only in their prefix, so the default
//! feeder of a validator is derived without any lookup.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validator operator address, always prefixed with `pvvaloper_`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatorAddress(String);

impl ValidatorAddress {
    pub const PREFIX: &'static str = "pvvaloper_";

    /// Create a validator address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed validator address.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(
            is_well_formed(&s, Self::PREFIX),
            "validator address must start with pvvaloper_"
        );
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The account address with the same identity (the default feeder).
    pub fn account(&self) -> AccountAddress {
        AccountAddress(format!(
            "{}{}",
            AccountAddress::PREFIX,
            &self.0[Self::PREFIX.len()..]
        ))
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ValidatorAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_well_formed(s, Self::PREFIX) {
            return Err(TypesError::InvalidAddress(s.to_string(), Self::PREFIX));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ValidatorAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ValidatorAddress> for String {
    fn from(address: ValidatorAddress) -> Self {
        address.0
    }
}

/// An account address, always prefixed with `pv_`. Feeders submit from accounts.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    pub const PREFIX: &'static str = "pv_";

    /// Create an account address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed account address.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(
            is_well_formed(&s, Self::PREFIX),
            "account address must start with pv_"
        );
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_well_formed(s, Self::PREFIX) {
            return Err(TypesError::InvalidAddress(s.to_string(), Self::PREFIX));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

fn is_well_formed(s: &str, prefix: &str) -> bool {
    s.len() > prefix.len()
        && s.starts_with(prefix)
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
