use acta_crypto::ContentHasher;
use acta_types::ContentDigest;

use crate::error::LedgerResult;
use crate::records::RegistrationRecord;
use crate::registry::Registry;

/// Outcome of checking one document against the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct Verification {
    pub digest: ContentDigest,
    /// Every registration of the digest, oldest first. Empty when unregistered.
    pub registrations: Vec<RegistrationRecord>,
}

impl Verification {
    /// Returns `true` if the digest has been registered at least once.
    pub fn is_registered(&self) -> bool {
        !self.registrations.is_empty()
    }

    /// The earliest registration, if any.
    pub fn first(&self) -> Option<&RegistrationRecord> {
        self.registrations.first()
    }
}

/// Read-only membership checks against a [`Registry`].
///
/// Every call re-hashes and re-scans; nothing is cached.
pub struct Verifier<'a> {
    registry: &'a Registry,
}

impl<'a> Verifier<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Has this exact content been registered?
    pub fn verify(&self, content: &str) -> LedgerResult<bool> {
        self.verify_digest(&ContentHasher::hash_text(content))
    }

    /// Has this digest been registered?
    pub fn verify_digest(&self, digest: &ContentDigest) -> LedgerResult<bool> {
        self.registry.exists_hash(digest)
    }

    /// Full report for `content`, including who registered it and when.
    pub fn inspect(&self, content: &str) -> LedgerResult<Verification> {
        let digest = ContentHasher::hash_text(content);
        let registrations = self.registry.registrations_of(&digest)?;
        Ok(Verification {
            digest,
            registrations,
        })
    }
}
