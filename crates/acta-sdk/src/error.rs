use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("no keypair in this session; generate one first")]
    NoSessionKey,

    #[error(transparent)]
    Ledger(#[from] acta_ledger::LedgerError),

    #[error("key error: {0}")]
    Key(#[from] acta_crypto::KeyError),
}

impl SdkError {
    /// Returns `true` for problems with caller input, which leave every store
    /// untouched.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Ledger(e) => e.is_validation(),
            Self::NoSessionKey | Self::Key(_) => true,
            Self::ConfigIo { .. } | Self::InvalidConfig { .. } => false,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
