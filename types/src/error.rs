//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid asset pair '{0}': expected 'base:quote'")]
    InvalidPair(String),

    #[error("invalid address '{0}': expected prefix {1}")]
    InvalidAddress(String, &'static str),

    #[error("invalid exchange rate tuples: {0}")]
    InvalidTuples(String),

    #[error("invalid decimal '{0}'")]
    InvalidDecimal(String),

    #[error("invalid vote hash: {0}")]
    InvalidHash(String),
}
