use acta_types::ContentDigest;
use sha2::{Digest, Sha256};

/// SHA-256 content hasher.
///
/// No normalization is applied: whitespace, case, and line endings are all
/// significant, so two documents hash equally only when their bytes do.
pub struct ContentHasher;

impl ContentHasher {
    /// Hash raw bytes.
    pub fn digest(data: &[u8]) -> ContentDigest {
        let hash: [u8; 32] = Sha256::digest(data).into();
        ContentDigest::from_hash(hash)
    }

    /// Hash the UTF-8 bytes of a text document.
    pub fn hash_text(content: &str) -> ContentDigest {
        Self::digest(content.as_bytes())
    }

    /// Verify that data produces the expected digest.
    pub fn verify(data: &[u8], expected: &ContentDigest) -> bool {
        Self::digest(data) == *expected
    }
}
