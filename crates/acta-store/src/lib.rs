//! Append-only record logs for Acta.
//!
//! Every Acta store is a sequence of JSON objects, one per line, that is only
//! ever appended to. This crate provides the storage seam the ledger and the
//! vote box are written against, so a flat file can later be swapped for an
//! indexed backend without touching callers.
//!
//! # Backends
//!
//! All backends implement the [`RecordLog`] trait:
//!
//! - [`JsonLinesLog`] -- file-backed, created lazily on first append
//! - [`InMemoryLog`] -- line buffer for tests and embedding
//!
//! # Design Rules
//!
//! 1. Records are never updated or deleted once appended.
//! 2. Each record is written with a single write call.
//! 3. A line that does not parse is reported as [`ScanItem::Corrupt`], never
//!    as an error; blank lines are ignored.
//! 4. I/O errors are propagated, never silently ignored.

pub mod error;
pub mod jsonl;
pub mod memory;
pub mod scan;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use jsonl::{JsonLinesLog, SyncMode};
pub use memory::InMemoryLog;
pub use scan::{ScanItem, ScanIter};
pub use traits::RecordLog;
