use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of hex characters in a rendered digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Content-addressed identifier for a registered document.
///
/// A `ContentDigest` is the SHA-256 hash of a document's exact bytes. It is
/// always rendered as 64 lowercase hex characters; parsing accepts either
/// case, so comparisons between a stored digest and user input are
/// case-insensitive by construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Create a `ContentDigest` from a pre-computed hash.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse a 64-character hex string in either case.
    ///
    /// The three failure modes are kept distinct so callers can report them
    /// separately: empty input, wrong length, and non-hex characters.
    pub fn parse_hex(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::Empty);
        }
        let actual = s.chars().count();
        if actual != DIGEST_HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                actual,
            });
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.short_hex())
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl From<[u8; 32]> for ContentDigest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ContentDigest> for [u8; 32] {
    fn from(digest: ContentDigest) -> Self {
        digest.0
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0b894166d3336435c800bea36ff21b29eaa801a52f584c006c49289a0dcf6e2f";

    #[test]
    fn hex_roundtrip() {
        let digest = ContentDigest::parse_hex(SAMPLE).unwrap();
        assert_eq!(digest.to_hex(), SAMPLE);
    }

    #[test]
    fn uppercase_input_normalizes_to_lowercase() {
        let upper = SAMPLE.to_uppercase();
        let digest = ContentDigest::parse_hex(&upper).unwrap();
        assert_eq!(digest.to_hex(), SAMPLE);
        assert_eq!(digest, ContentDigest::parse_hex(SAMPLE).unwrap());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(ContentDigest::parse_hex(""), Err(TypeError::Empty));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = ContentDigest::parse_hex("abc123").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 64,
                actual: 6
            }
        );
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        let bad = format!("zz{}", &SAMPLE[2..]);
        assert!(matches!(
            ContentDigest::parse_hex(&bad),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn short_hex_is_8_chars() {
        let digest = ContentDigest::parse_hex(SAMPLE).unwrap();
        assert_eq!(digest.short_hex(), "0b894166");
    }

    #[test]
    fn display_is_full_hex() {
        let digest = ContentDigest::from_hash([0xab; 32]);
        let display = format!("{digest}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, digest.to_hex());
    }

    #[test]
    fn serializes_as_hex_string() {
        let digest = ContentDigest::parse_hex(SAMPLE).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));
    }

    #[test]
    fn deserialize_rejects_non_digest() {
        let parsed: Result<ContentDigest, _> = serde_json::from_str("\"not-a-digest\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn from_str_matches_parse_hex() {
        let parsed: ContentDigest = SAMPLE.parse().unwrap();
        assert_eq!(parsed, ContentDigest::parse_hex(SAMPLE).unwrap());
    }

    proptest::proptest! {
        #[test]
        fn any_hash_survives_hex_rendering(bytes in proptest::array::uniform32(proptest::num::u8::ANY)) {
            let digest = ContentDigest::from_hash(bytes);
            let hex = digest.to_hex();
            proptest::prop_assert_eq!(hex.len(), DIGEST_HEX_LEN);
            proptest::prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            proptest::prop_assert_eq!(ContentDigest::parse_hex(&hex).unwrap(), digest);
        }
    }
}
