use std::collections::BTreeMap;
use std::io::Write;

use acta_crypto::{ContentHasher, ToyKeypair};
use acta_ledger::{
    parse_vote_target, BallotBox, RegistrationRecord, Registry, Tally, TallyBuilder, Verification,
    Verifier, VoteRecord,
};
use acta_store::{JsonLinesLog, RecordLog, ScanItem};
use acta_types::{ContentDigest, VoteChoice};
use tracing::debug;

use crate::config::ActaConfig;
use crate::error::SdkResult;
use crate::session::Session;

/// High-level Acta API.
///
/// Owns the ledger and the vote store. Every operation runs to completion
/// against the backing logs; nothing is cached between calls.
pub struct Acta {
    registry: Registry,
    ballots: BallotBox,
}

impl Acta {
    /// Open the file-backed stores described by `config`.
    ///
    /// Nothing is created on disk until the first registration or vote.
    pub fn open(config: &ActaConfig) -> Self {
        let ledger_path = config.ledger_path();
        let votes_path = config.votes_path();
        debug!(
            ledger = %ledger_path.display(),
            votes = %votes_path.display(),
            "opening stores"
        );
        let ledger = JsonLinesLog::open(ledger_path).with_sync_mode(config.sync_mode());
        let votes = JsonLinesLog::open(votes_path).with_sync_mode(config.sync_mode());
        Self::with_logs(ledger, votes)
    }

    /// Stores held entirely in memory.
    pub fn in_memory() -> Self {
        Self {
            registry: Registry::in_memory(),
            ballots: BallotBox::in_memory(),
        }
    }

    /// Stores over caller-supplied log backends.
    pub fn with_logs(
        ledger: impl RecordLog<RegistrationRecord> + 'static,
        votes: impl RecordLog<VoteRecord> + 'static,
    ) -> Self {
        Self {
            registry: Registry::new(ledger),
            ballots: BallotBox::new(votes),
        }
    }

    // ---- Content operations ----

    /// Digest of `content`, without touching any store.
    pub fn hash(&self, content: &str) -> ContentDigest {
        ContentHasher::hash_text(content)
    }

    /// Does `content` hash to the digest given as hex in `expected`?
    pub fn hash_matches(&self, content: &str, expected: &str) -> SdkResult<bool> {
        let expected = parse_vote_target(expected)?;
        Ok(ContentHasher::verify(content.as_bytes(), &expected))
    }

    pub fn register(&self, owner: &str, content: &str) -> SdkResult<RegistrationRecord> {
        Ok(self.registry.register(owner, content)?)
    }

    pub fn verify(&self, content: &str) -> SdkResult<bool> {
        Ok(Verifier::new(&self.registry).verify(content)?)
    }

    /// Verification with the matching registrations attached.
    pub fn inspect(&self, content: &str) -> SdkResult<Verification> {
        Ok(Verifier::new(&self.registry).inspect(content)?)
    }

    /// The `n` most recent registrations, newest first.
    pub fn list_recent(&self, n: usize) -> SdkResult<Vec<RegistrationRecord>> {
        Ok(self.registry.list_recent(n)?)
    }

    /// Every ledger line, malformed ones included.
    pub fn ledger_entries(&self) -> SdkResult<Vec<ScanItem<RegistrationRecord>>> {
        Ok(self.registry.entries()?)
    }

    // ---- Voting ----

    pub fn cast_vote(
        &self,
        hash: &str,
        choice: VoteChoice,
        voter: Option<&str>,
    ) -> SdkResult<VoteRecord> {
        Ok(self
            .ballots
            .cast_vote(&self.registry, hash, choice, voter)?)
    }

    /// Cast a vote carrying the session's public key, if it has one.
    pub fn cast_vote_as(
        &self,
        session: &Session,
        hash: &str,
        choice: VoteChoice,
    ) -> SdkResult<VoteRecord> {
        let voter = session.voter();
        self.cast_vote(hash, choice, voter.as_deref())
    }

    /// Every vote line, malformed ones included.
    pub fn vote_entries(&self) -> SdkResult<Vec<ScanItem<VoteRecord>>> {
        Ok(self.ballots.entries()?)
    }

    /// Tally for one digest, or across the whole vote store when `hash` is
    /// `None`. The digest does not need to be registered.
    pub fn tally(&self, hash: Option<&str>) -> SdkResult<Tally> {
        match hash {
            Some(input) => {
                let digest = parse_vote_target(input)?;
                Ok(self.ballots.tally_for(&digest)?)
            }
            None => Ok(self.ballots.tally_global()?),
        }
    }

    /// Exact-match tallies for every digest that has votes.
    pub fn tally_by_hash(&self) -> SdkResult<BTreeMap<ContentDigest, Tally>> {
        let votes = self.ballots.read_all()?;
        Ok(TallyBuilder::by_hash(&votes))
    }

    // ---- Keys ----

    /// A standalone toy keypair, not bound to any session.
    pub fn generate_keypair(&self) -> ToyKeypair {
        ToyKeypair::generate()
    }

    // ---- Export ----

    /// Copy the raw ledger file to `out`. Returns bytes written.
    pub fn export_ledger(&self, out: &mut dyn Write) -> SdkResult<u64> {
        Ok(self.registry.export(out)?)
    }

    /// Copy the raw vote file to `out`. Returns bytes written.
    pub fn export_votes(&self, out: &mut dyn Write) -> SdkResult<u64> {
        Ok(self.ballots.export(out)?)
    }

    pub fn ballots(&self) -> &BallotBox {
        &self.ballots
    }
}
