//! Append-only document registration ledger for Acta.
//!
//! This crate is the heart of Acta. It provides:
//! - [`RegistrationRecord`] and [`VoteRecord`], the two line shapes on disk
//! - [`Registry`], the ledger store (register, read, membership by digest)
//! - [`Verifier`], which answers "has this exact content been registered?"
//! - [`BallotBox`], the vote store with its cast-time preconditions
//! - [`Tally`] / [`TallyBuilder`], global and digest-scoped vote counts
//!
//! Records carry no hash chain: a registration's digest covers only its own
//! content, not the ledger that precedes it.

pub mod ballot;
pub mod error;
pub mod records;
pub mod registry;
pub mod tally;
pub mod verifier;

pub use ballot::{parse_vote_target, BallotBox};
pub use error::{LedgerError, LedgerResult};
pub use records::{RegistrationRecord, VoteRecord};
pub use registry::Registry;
pub use tally::{Tally, TallyBuilder, Verdict};
pub use verifier::{Verification, Verifier};
