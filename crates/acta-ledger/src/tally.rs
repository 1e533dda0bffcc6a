use std::collections::BTreeMap;
use std::fmt;

use acta_types::{ContentDigest, VoteChoice, VoteValue};
use serde::Serialize;

use crate::records::VoteRecord;

/// Affirmative and negative vote counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub affirmative: u64,
    pub negative: u64,
}

/// Simple-majority reading of a [`Tally`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    Invalid,
    Tied,
    NoVotes,
}

impl Tally {
    pub fn new(affirmative: u64, negative: u64) -> Self {
        Self {
            affirmative,
            negative,
        }
    }

    /// Number of votes counted.
    pub fn total(&self) -> u64 {
        self.affirmative + self.negative
    }

    /// Majority outcome. No quorum, no weighting.
    pub fn verdict(&self) -> Verdict {
        match (self.total(), self.affirmative.cmp(&self.negative)) {
            (0, _) => Verdict::NoVotes,
            (_, std::cmp::Ordering::Greater) => Verdict::Valid,
            (_, std::cmp::Ordering::Less) => Verdict::Invalid,
            (_, std::cmp::Ordering::Equal) => Verdict::Tied,
        }
    }
}

impl std::ops::Add for Tally {
    type Output = Tally;

    fn add(self, rhs: Tally) -> Tally {
        Tally::new(
            self.affirmative + rhs.affirmative,
            self.negative + rhs.negative,
        )
    }
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Tally {
        iter.fold(Tally::default(), |acc, t| acc + t)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
            Self::Tied => write!(f, "tied"),
            Self::NoVotes => write!(f, "no votes"),
        }
    }
}

/// Deterministic vote aggregation.
///
/// The digest-scoped and global counts deliberately use different bucketing
/// for vote values other than the two known literals:
/// - [`TallyBuilder::for_hash`] and [`TallyBuilder::by_hash`] count only exact
///   `"affirmative"` / `"negative"` and ignore anything else;
/// - [`TallyBuilder::global`] counts `"affirmative"` and puts every other
///   value, known or not, in the negative bucket.
///
/// For logs holding only the two literals the global tally equals the sum of
/// the per-digest tallies.
pub struct TallyBuilder;

impl TallyBuilder {
    pub fn for_hash<'a>(
        votes: impl IntoIterator<Item = &'a VoteRecord>,
        digest: &ContentDigest,
    ) -> Tally {
        votes
            .into_iter()
            .filter(|vote| vote.hash == *digest)
            .fold(Tally::default(), |acc, vote| acc + exact(&vote.vote))
    }

    pub fn global<'a>(votes: impl IntoIterator<Item = &'a VoteRecord>) -> Tally {
        votes.into_iter().fold(Tally::default(), |mut acc, vote| {
            if vote.vote.is_affirmative() {
                acc.affirmative += 1;
            } else {
                acc.negative += 1;
            }
            acc
        })
    }

    /// Per-digest tallies for every digest that has at least one vote line,
    /// ordered by digest.
    pub fn by_hash<'a>(
        votes: impl IntoIterator<Item = &'a VoteRecord>,
    ) -> BTreeMap<ContentDigest, Tally> {
        let mut tallies: BTreeMap<ContentDigest, Tally> = BTreeMap::new();
        for vote in votes {
            let entry = tallies.entry(vote.hash).or_default();
            *entry = *entry + exact(&vote.vote);
        }
        tallies
    }
}

fn exact(value: &VoteValue) -> Tally {
    match value.choice() {
        Some(VoteChoice::Affirmative) => Tally::new(1, 0),
        Some(VoteChoice::Negative) => Tally::new(0, 1),
        None => Tally::default(),
    }
}
