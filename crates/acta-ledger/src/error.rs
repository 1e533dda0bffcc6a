use acta_store::StoreError;
use acta_types::ContentDigest;

/// Errors produced by ledger operations.
///
/// Validation variants abort the operation before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("owner must not be empty")]
    EmptyOwner,

    #[error("content must not be empty")]
    EmptyContent,

    #[error("empty input")]
    EmptyInput,

    #[error("not a valid hex digest: {0}")]
    InvalidDigest(String),

    #[error("hash not found in ledger: {0}")]
    HashNotFound(ContentDigest),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns `true` for caller input problems, as opposed to storage failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
