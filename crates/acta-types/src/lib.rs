//! Foundation types for Acta.
//!
//! This crate provides the identity, temporal, and vote types shared by every
//! other Acta crate.
//!
//! # Key Types
//!
//! - [`ContentDigest`]: SHA-256 content identifier, rendered as lowercase hex
//! - [`EpochSeconds`]: Floating point UNIX timestamp recorded at append time
//! - [`VoteChoice`]: What a caller may cast (affirmative / negative)
//! - [`VoteValue`]: What a reader may find in a stored vote line

pub mod digest;
pub mod error;
pub mod temporal;
pub mod vote;

pub use digest::ContentDigest;
pub use error::TypeError;
pub use temporal::EpochSeconds;
pub use vote::{VoteChoice, VoteValue};
