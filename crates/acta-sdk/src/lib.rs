//! High-level SDK for Acta.
//!
//! Provides one entry point, [`Acta`], over the registration ledger and the
//! vote store, plus the configuration that locates them on disk and the
//! [`Session`] that carries a toy keypair for the length of one interactive
//! session. Front ends (the `acta` CLI, a web UI, an HTTP API) call only this
//! crate.

pub mod config;
pub mod error;
pub mod repository;
pub mod session;

pub use config::{ActaConfig, CONFIG_FILE_NAME};
pub use error::{SdkError, SdkResult};
pub use repository::Acta;
pub use session::Session;

// Re-export key types
pub use acta_crypto::ToyKeypair;
pub use acta_ledger::{RegistrationRecord, Tally, Verdict, Verification, VoteRecord};
pub use acta_store::ScanItem;
pub use acta_types::{ContentDigest, EpochSeconds, VoteChoice, VoteValue};
