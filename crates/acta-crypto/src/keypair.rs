use acta_types::ContentDigest;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::hasher::ContentHasher;

/// Number of random bytes in a toy private key.
pub const PRIVATE_KEY_BYTES: usize = 16;

/// Demonstration keypair: a random private string and its hash.
///
/// The public key is `sha256(private_hex)`. Nothing can be signed with it and
/// knowing the public key says nothing about who holds the private one; it
/// only gives a voter a stable pseudonym for the life of a session.
#[derive(Clone, PartialEq, Eq)]
pub struct ToyKeypair {
    private_hex: String,
    public_key: ContentDigest,
}

impl ToyKeypair {
    /// Generate a new keypair from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut secret = [0u8; PRIVATE_KEY_BYTES];
        OsRng.fill_bytes(&mut secret);
        Self::derive(hex::encode(secret))
    }

    /// Rebuild a keypair from a previously generated private key.
    pub fn from_private_hex(private_hex: &str) -> Result<Self, KeyError> {
        let trimmed = private_hex.trim();
        let bytes = hex::decode(trimmed).map_err(|_| KeyError::InvalidPrivateKey)?;
        if bytes.len() != PRIVATE_KEY_BYTES {
            return Err(KeyError::InvalidPrivateKey);
        }
        Ok(Self::derive(hex::encode(bytes)))
    }

    fn derive(private_hex: String) -> Self {
        let public_key = ContentHasher::hash_text(&private_hex);
        Self {
            private_hex,
            public_key,
        }
    }

    /// The private key as 32 lowercase hex characters.
    pub fn private_hex(&self) -> &str {
        &self.private_hex
    }

    /// The public key digest.
    pub fn public_key(&self) -> &ContentDigest {
        &self.public_key
    }

    /// The public key as it is written into a vote's `voter` field.
    pub fn public_hex(&self) -> String {
        self.public_key.to_hex()
    }
}

impl std::fmt::Debug for ToyKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ToyKeypair(private=<redacted>, public={})",
            self.public_key.short_hex()
        )
    }
}

/// Errors from keypair operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("private key must be {} hex characters", PRIVATE_KEY_BYTES * 2)]
    InvalidPrivateKey,
}
