use acta_types::{ContentDigest, EpochSeconds, VoteChoice, VoteValue};
use serde::{Deserialize, Serialize};

/// One line of the ledger file.
///
/// ```json
/// {"owner": "Ana", "hash": "<64-hex>", "time": 1718000000.25}
/// ```
///
/// `hash` is fixed when the record is created and never recomputed. Several
/// records may share a hash; each registration is its own entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub owner: String,
    pub hash: ContentDigest,
    pub time: EpochSeconds,
}

impl RegistrationRecord {
    pub fn new(owner: impl Into<String>, hash: ContentDigest, time: EpochSeconds) -> Self {
        Self {
            owner: owner.into(),
            hash,
            time,
        }
    }
}

/// One line of the vote file.
///
/// ```json
/// {"hash": "<64-hex>", "vote": "affirmative", "time": 1718000000.25, "voter": "<64-hex>"}
/// ```
///
/// `voter` is omitted entirely when the caster supplied no identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub hash: ContentDigest,
    pub vote: VoteValue,
    pub time: EpochSeconds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter: Option<String>,
}

impl VoteRecord {
    pub fn new(
        hash: ContentDigest,
        choice: VoteChoice,
        time: EpochSeconds,
        voter: Option<String>,
    ) -> Self {
        Self {
            hash,
            vote: choice.into(),
            time,
            voter,
        }
    }
}
