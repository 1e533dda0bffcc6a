use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Storage literal for an affirmative vote.
pub const AFFIRMATIVE: &str = "affirmative";
/// Storage literal for a negative vote.
pub const NEGATIVE: &str = "negative";

/// A vote a caller may cast on a registered digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteChoice {
    /// The registered content is considered valid.
    Affirmative,
    /// The registered content is considered invalid.
    Negative,
}

impl VoteChoice {
    /// The literal written to the vote file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Affirmative => AFFIRMATIVE,
            Self::Negative => NEGATIVE,
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteChoice {
    type Err = TypeError;

    /// Accepts the storage literals plus the short yes/no labels used by
    /// front ends, in English and Spanish, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "affirmative" | "a" | "yes" | "y" | "si" | "sí" => Ok(Self::Affirmative),
            "negative" | "n" | "no" => Ok(Self::Negative),
            "" => Err(TypeError::Empty),
            other => Err(TypeError::InvalidChoice(other.to_string())),
        }
    }
}

impl Serialize for VoteChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A vote value as found in the vote file.
///
/// Readers must cope with lines written by other tools or older versions, so
/// any string is accepted and unknown literals are kept verbatim in
/// [`VoteValue::Other`]. Matching against the two known literals is exact and
/// case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VoteValue {
    Affirmative,
    Negative,
    Other(String),
}

impl VoteValue {
    /// The literal as stored.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Affirmative => AFFIRMATIVE,
            Self::Negative => NEGATIVE,
            Self::Other(raw) => raw,
        }
    }

    /// Returns `true` for the exact affirmative literal.
    pub fn is_affirmative(&self) -> bool {
        matches!(self, Self::Affirmative)
    }

    /// The cast-side choice, if this value is one of the known literals.
    pub fn choice(&self) -> Option<VoteChoice> {
        match self {
            Self::Affirmative => Some(VoteChoice::Affirmative),
            Self::Negative => Some(VoteChoice::Negative),
            Self::Other(_) => None,
        }
    }
}

impl From<VoteChoice> for VoteValue {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Affirmative => Self::Affirmative,
            VoteChoice::Negative => Self::Negative,
        }
    }
}

impl From<&str> for VoteValue {
    fn from(raw: &str) -> Self {
        match raw {
            AFFIRMATIVE => Self::Affirmative,
            NEGATIVE => Self::Negative,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VoteValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VoteValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parses_storage_literals() {
        assert_eq!("affirmative".parse::<VoteChoice>().unwrap(), VoteChoice::Affirmative);
        assert_eq!("negative".parse::<VoteChoice>().unwrap(), VoteChoice::Negative);
    }

    #[test]
    fn choice_parses_localized_labels() {
        assert_eq!("Sí".parse::<VoteChoice>().unwrap(), VoteChoice::Affirmative);
        assert_eq!("YES".parse::<VoteChoice>().unwrap(), VoteChoice::Affirmative);
        assert_eq!("No".parse::<VoteChoice>().unwrap(), VoteChoice::Negative);
    }

    #[test]
    fn choice_rejects_unknown_and_empty() {
        assert_eq!("".parse::<VoteChoice>(), Err(TypeError::Empty));
        assert_eq!(
            "maybe".parse::<VoteChoice>(),
            Err(TypeError::InvalidChoice("maybe".into()))
        );
    }

    #[test]
    fn value_matching_is_exact() {
        assert_eq!(VoteValue::from("affirmative"), VoteValue::Affirmative);
        assert_eq!(
            VoteValue::from("Affirmative"),
            VoteValue::Other("Affirmative".into())
        );
        assert_eq!(VoteValue::from("Sí"), VoteValue::Other("Sí".into()));
    }

    #[test]
    fn value_keeps_unknown_literal_verbatim() {
        let parsed: VoteValue = serde_json::from_str("\"abstain\"").unwrap();
        assert_eq!(parsed.as_str(), "abstain");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"abstain\"");
        assert!(parsed.choice().is_none());
    }

    #[test]
    fn choice_and_value_share_literals() {
        for choice in [VoteChoice::Affirmative, VoteChoice::Negative] {
            let value = VoteValue::from(choice);
            assert_eq!(value.as_str(), choice.as_str());
            assert_eq!(value.choice(), Some(choice));
            assert_eq!(
                serde_json::to_string(&choice).unwrap(),
                serde_json::to_string(&value).unwrap()
            );
        }
    }
}
