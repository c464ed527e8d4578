use pricevote_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    // ── Rejected submissions ────────────────────────────────────────────
    #[error("validator {voter} already submitted a prevote in period {period}")]
    DuplicatePrevote { voter: String, period: u64 },

    #[error("validator {voter} already revealed a vote in period {period}")]
    DuplicateVote { voter: String, period: u64 },

    #[error("validator {voter} has no prevote from period {expected_period}")]
    NoMatchingPrevote { voter: String, expected_period: u64 },

    #[error("revealed rates of validator {0} do not match its prevote hash")]
    HashMismatch(String),

    #[error("pair {0} is not whitelisted")]
    PairNotWhitelisted(String),

    #[error("exchange rate {rate} for pair {pair} is negative")]
    NonPositiveRate { pair: String, rate: String },

    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    #[error("invalid exchange rate tuples: {0}")]
    InvalidTuples(String),

    #[error("account {feeder} is not the authorized feeder of validator {validator}")]
    FeederNotAuthorized { feeder: String, validator: String },

    #[error("validator {0} is not bonded")]
    ValidatorNotBonded(String),

    // ── Configuration ───────────────────────────────────────────────────
    #[error("invalid oracle params: {0}")]
    InvalidParams(String),

    // ── Programming errors ──────────────────────────────────────────────
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl OracleError {
    /// Whether this error rejects a single submission, leaving state untouched.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::InvalidParams(_) | Self::InvariantViolation(_) | Self::Store(_)
        )
    }
}

impl From<pricevote_types::TypesError> for OracleError {
    fn from(e: pricevote_types::TypesError) -> Self {
        Self::InvalidTuples(e.to_string())
    }
}
