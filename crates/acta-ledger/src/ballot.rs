use std::io::Write;

use acta_store::{InMemoryLog, RecordLog, ScanItem};
use acta_types::{ContentDigest, EpochSeconds, TypeError, VoteChoice};
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::records::VoteRecord;
use crate::registry::Registry;
use crate::tally::{Tally, TallyBuilder};

/// Validate user input naming the digest to vote on.
///
/// Surrounding whitespace is ignored and either hex case is accepted.
pub fn parse_vote_target(input: &str) -> LedgerResult<ContentDigest> {
    ContentDigest::parse_hex(input.trim()).map_err(|e| match e {
        TypeError::Empty => LedgerError::EmptyInput,
        other => LedgerError::InvalidDigest(other.to_string()),
    })
}

/// The vote store: an append-only log of [`VoteRecord`]s.
///
/// There is no deduplication. The same voter may vote any number of times,
/// either way, on the same digest; every successful cast is one record.
pub struct BallotBox {
    log: Box<dyn RecordLog<VoteRecord>>,
}

impl BallotBox {
    /// A ballot box over the given log backend.
    pub fn new(log: impl RecordLog<VoteRecord> + 'static) -> Self {
        Self { log: Box::new(log) }
    }

    /// A ballot box backed by an [`InMemoryLog`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryLog::new())
    }

    /// Cast a vote on a registered digest.
    ///
    /// Fails without writing if the input is empty, is not a 64-character hex
    /// digest, or names a digest absent from `registry` at this moment. The
    /// check and the append are not atomic.
    pub fn cast_vote(
        &self,
        registry: &Registry,
        hash: &str,
        choice: VoteChoice,
        voter: Option<&str>,
    ) -> LedgerResult<VoteRecord> {
        let digest = parse_vote_target(hash)?;
        if !registry.exists_hash(&digest)? {
            return Err(LedgerError::HashNotFound(digest));
        }

        let voter = voter
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let record = VoteRecord::new(digest, choice, EpochSeconds::now(), voter);
        self.log.append(&record)?;

        info!(
            hash = %digest.short_hex(),
            vote = %choice,
            voter = record.voter.as_deref().unwrap_or("-"),
            "vote cast"
        );
        Ok(record)
    }

    /// Every vote, oldest first, skipping malformed lines.
    pub fn read_all(&self) -> LedgerResult<Vec<VoteRecord>> {
        Ok(self.log.records()?)
    }

    /// Every non-blank line, malformed ones included, for diagnostic views.
    pub fn entries(&self) -> LedgerResult<Vec<ScanItem<VoteRecord>>> {
        let entries = self.log.scan()?.collect::<Result<Vec<_>, _>>()?;
        debug!(
            entries = entries.len(),
            corrupt = entries.iter().filter(|e| e.is_corrupt()).count(),
            "vote log scanned"
        );
        Ok(entries)
    }

    /// Votes on `digest`, bucketed by exact literal.
    pub fn tally_for(&self, digest: &ContentDigest) -> LedgerResult<Tally> {
        let votes = self.read_all()?;
        Ok(TallyBuilder::for_hash(&votes, digest))
    }

    /// Votes across every digest; anything not affirmative counts negative.
    pub fn tally_global(&self) -> LedgerResult<Tally> {
        let votes = self.read_all()?;
        Ok(TallyBuilder::global(&votes))
    }

    /// Copy the raw vote log bytes to `out`.
    pub fn export(&self, out: &mut dyn Write) -> LedgerResult<u64> {
        Ok(self.log.export(out)?)
    }
}

impl std::fmt::Debug for BallotBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BallotBox").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acta_crypto::ContentHasher;
    use acta_types::VoteValue;

    fn registered() -> (Registry, String) {
        let registry = Registry::in_memory();
        let record = registry.register("Ana", "hola mundo").unwrap();
        (registry, record.hash.to_hex())
    }

    #[test]
    fn vote_on_registered_hash_succeeds() {
        let (registry, hash) = registered();
        let ballots = BallotBox::in_memory();
        let vote = ballots
            .cast_vote(&registry, &hash, VoteChoice::Affirmative, None)
            .unwrap();
        assert_eq!(vote.hash.to_hex(), hash);
        assert_eq!(vote.vote, VoteValue::Affirmative);
        assert!(vote.voter.is_none());
        assert_eq!(ballots.read_all().unwrap(), vec![vote]);
    }

    #[test]
    fn empty_hash_is_rejected() {
        let (registry, _) = registered();
        let ballots = BallotBox::in_memory();
        let err = ballots
            .cast_vote(&registry, "   ", VoteChoice::Affirmative, None)
            .unwrap_err();
        assert!(matches!(err, LedgerError::EmptyInput));
        assert_eq!(err.to_string(), "empty input");
        assert!(ballots.read_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_hash_is_rejected() {
        let (registry, hash) = registered();
        let ballots = BallotBox::in_memory();
        let non_hex = format!("{}g", &hash[..63]);
        for bad in ["abc", &hash[..63], non_hex.as_str()] {
            let err = ballots
                .cast_vote(&registry, bad, VoteChoice::Negative, None)
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidDigest(_)), "{bad}: {err}");
        }
        assert!(ballots.read_all().unwrap().is_empty());
    }

    #[test]
    fn unregistered_hash_is_rejected() {
        let (registry, _) = registered();
        let ballots = BallotBox::in_memory();
        let unknown = ContentHasher::hash_text("never registered").to_hex();
        let err = ballots
            .cast_vote(&registry, &unknown, VoteChoice::Affirmative, None)
            .unwrap_err();
        assert!(matches!(err, LedgerError::HashNotFound(_)));
        assert!(err.to_string().contains("not found"));
        assert!(ballots.read_all().unwrap().is_empty());
    }

    #[test]
    fn uppercase_hash_is_normalized() {
        let (registry, hash) = registered();
        let ballots = BallotBox::in_memory();
        let vote = ballots
            .cast_vote(
                &registry,
                &format!("  {}  ", hash.to_uppercase()),
                VoteChoice::Affirmative,
                None,
            )
            .unwrap();
        assert_eq!(vote.hash.to_hex(), hash);
    }

    #[test]
    fn voter_is_recorded_when_given() {
        let (registry, hash) = registered();
        let ballots = BallotBox::in_memory();
        let vote = ballots
            .cast_vote(&registry, &hash, VoteChoice::Negative, Some(" pk "))
            .unwrap();
        assert_eq!(vote.voter.as_deref(), Some("pk"));

        let blank = ballots
            .cast_vote(&registry, &hash, VoteChoice::Negative, Some("  "))
            .unwrap();
        assert!(blank.voter.is_none());
    }

    #[test]
    fn repeated_votes_are_all_recorded() {
        let (registry, hash) = registered();
        let ballots = BallotBox::in_memory();
        for _ in 0..2 {
            ballots
                .cast_vote(&registry, &hash, VoteChoice::Affirmative, Some("same"))
                .unwrap();
            ballots
                .cast_vote(&registry, &hash, VoteChoice::Negative, Some("same"))
                .unwrap();
        }
        assert_eq!(ballots.read_all().unwrap().len(), 4);
    }

    #[test]
    fn three_affirmative_one_negative() {
        let (registry, hash) = registered();
        let ballots = BallotBox::in_memory();
        for _ in 0..3 {
            ballots
                .cast_vote(&registry, &hash, VoteChoice::Affirmative, None)
                .unwrap();
        }
        ballots
            .cast_vote(&registry, &hash, VoteChoice::Negative, None)
            .unwrap();

        let digest = parse_vote_target(&hash).unwrap();
        let tally = ballots.tally_for(&digest).unwrap();
        assert_eq!((tally.affirmative, tally.negative), (3, 1));
        assert_eq!(ballots.tally_global().unwrap(), tally);
    }

    #[test]
    fn parse_vote_target_reasons() {
        assert!(matches!(parse_vote_target(""), Err(LedgerError::EmptyInput)));
        assert!(matches!(
            parse_vote_target("xyz"),
            Err(LedgerError::InvalidDigest(_))
        ));
    }
}
