use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("oracle error: {0}")]
    Oracle(#[from] pricevote_oracle::OracleError),

    #[error("store error: {0}")]
    Store(#[from] pricevote_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] pricevote_store_lmdb::LmdbError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// Whether the error only refused one submission.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Oracle(e) if e.is_rejection())
    }
}
