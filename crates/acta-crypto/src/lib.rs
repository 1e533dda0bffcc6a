//! Hashing and toy key material for Acta.
//!
//! Provides the SHA-256 content hasher every other component depends on, and
//! a demonstration keypair whose public half is simply the hash of its
//! private half.
//!
//! The keypair is not a signature scheme and offers no security guarantee.

pub mod hasher;
pub mod keypair;

pub use hasher::ContentHasher;
pub use keypair::{KeyError, ToyKeypair};
