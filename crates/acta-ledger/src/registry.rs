use std::io::Write;

use acta_crypto::ContentHasher;
use acta_store::{InMemoryLog, RecordLog, ScanItem};
use acta_types::{ContentDigest, EpochSeconds};
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::records::RegistrationRecord;

/// The ledger store: an append-only log of [`RegistrationRecord`]s.
///
/// Lookups are linear scans over the log. The log itself sits behind
/// [`RecordLog`], so an indexed backend can be dropped in without changing
/// any caller.
pub struct Registry {
    log: Box<dyn RecordLog<RegistrationRecord>>,
}

impl Registry {
    /// A registry over the given log backend.
    pub fn new(log: impl RecordLog<RegistrationRecord> + 'static) -> Self {
        Self { log: Box::new(log) }
    }

    /// A registry backed by an [`InMemoryLog`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryLog::new())
    }

    /// Register `content` under `owner`.
    ///
    /// Both must be non-empty after trimming. The owner is stored trimmed;
    /// the content is hashed exactly as given.
    pub fn register(&self, owner: &str, content: &str) -> LedgerResult<RegistrationRecord> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(LedgerError::EmptyOwner);
        }
        if content.trim().is_empty() {
            return Err(LedgerError::EmptyContent);
        }

        let record = RegistrationRecord::new(
            owner,
            ContentHasher::hash_text(content),
            EpochSeconds::now(),
        );
        self.log.append(&record)?;

        info!(owner = %record.owner, hash = %record.hash.short_hex(), "document registered");
        Ok(record)
    }

    /// Lazily iterate registrations, oldest first, skipping malformed lines.
    pub fn records(&self) -> LedgerResult<impl Iterator<Item = LedgerResult<RegistrationRecord>> + '_> {
        Ok(self.log.scan()?.filter_map(|item| match item {
            Ok(ScanItem::Record(record)) => Some(Ok(record)),
            Ok(ScanItem::Corrupt { .. }) => None,
            Err(e) => Some(Err(LedgerError::from(e))),
        }))
    }

    /// Every registration, oldest first, skipping malformed lines.
    pub fn read_all(&self) -> LedgerResult<Vec<RegistrationRecord>> {
        Ok(self.log.records()?)
    }

    /// Every non-blank line, malformed ones included, for diagnostic views.
    pub fn entries(&self) -> LedgerResult<Vec<ScanItem<RegistrationRecord>>> {
        let entries = self.log.scan()?.collect::<Result<Vec<_>, _>>()?;
        debug!(
            entries = entries.len(),
            corrupt = entries.iter().filter(|e| e.is_corrupt()).count(),
            "ledger scanned"
        );
        Ok(entries)
    }

    /// Returns `true` if any registration carries `digest`.
    pub fn exists_hash(&self, digest: &ContentDigest) -> LedgerResult<bool> {
        Ok(self.log.any(&mut |record: &RegistrationRecord| record.hash == *digest)?)
    }

    /// All registrations of `digest`, oldest first.
    pub fn registrations_of(&self, digest: &ContentDigest) -> LedgerResult<Vec<RegistrationRecord>> {
        let mut found = Vec::new();
        for record in self.records()? {
            let record = record?;
            if record.hash == *digest {
                found.push(record);
            }
        }
        Ok(found)
    }

    /// The `n` most recent registrations, newest first.
    pub fn list_recent(&self, n: usize) -> LedgerResult<Vec<RegistrationRecord>> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(n);
        let mut recent = records.split_off(skip);
        recent.reverse();
        Ok(recent)
    }

    /// Copy the raw ledger bytes to `out`.
    pub fn export(&self, out: &mut dyn Write) -> LedgerResult<u64> {
        Ok(self.log.export(out)?)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acta_store::JsonLinesLog;

    #[test]
    fn register_hashes_content() {
        let registry = Registry::in_memory();
        let record = registry.register("Ana", "hola mundo").unwrap();
        assert_eq!(record.owner, "Ana");
        assert_eq!(
            record.hash.to_hex(),
            "0b894166d3336435c800bea36ff21b29eaa801a52f584c006c49289a0dcf6e2f"
        );
        assert!(record.time.as_secs() > 0.0);
    }

    #[test]
    fn owner_is_trimmed_content_is_not() {
        let registry = Registry::in_memory();
        let record = registry.register("  Ana \n", " hola mundo").unwrap();
        assert_eq!(record.owner, "Ana");
        assert_eq!(record.hash, ContentHasher::hash_text(" hola mundo"));
    }

    #[test]
    fn empty_owner_is_rejected_without_write() {
        let registry = Registry::in_memory();
        let err = registry.register("   ", "content").unwrap_err();
        assert!(matches!(err, LedgerError::EmptyOwner));
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn empty_content_is_rejected_without_write() {
        let registry = Registry::in_memory();
        let err = registry.register("Ana", " \t\n").unwrap_err();
        assert!(matches!(err, LedgerError::EmptyContent));
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn re_registration_appends_a_second_record() {
        let registry = Registry::in_memory();
        let first = registry.register("Ana", "doc").unwrap();
        let second = registry.register("Luis", "doc").unwrap();
        assert_eq!(first.hash, second.hash);
        assert_eq!(registry.read_all().unwrap().len(), 2);

        let owners: Vec<_> = registry
            .registrations_of(&first.hash)
            .unwrap()
            .into_iter()
            .map(|r| r.owner)
            .collect();
        assert_eq!(owners, vec!["Ana", "Luis"]);
    }

    #[test]
    fn exists_hash_tracks_registrations() {
        let registry = Registry::in_memory();
        let digest = ContentHasher::hash_text("doc");
        assert!(!registry.exists_hash(&digest).unwrap());
        registry.register("Ana", "doc").unwrap();
        assert!(registry.exists_hash(&digest).unwrap());
    }

    #[test]
    fn list_recent_is_newest_first() {
        let registry = Registry::in_memory();
        for owner in ["a", "b", "c", "d"] {
            registry.register(owner, owner).unwrap();
        }
        let owners: Vec<_> = registry
            .list_recent(3)
            .unwrap()
            .into_iter()
            .map(|r| r.owner)
            .collect();
        assert_eq!(owners, vec!["d", "c", "b"]);
        assert_eq!(registry.list_recent(10).unwrap().len(), 4);
        assert!(registry.list_recent(0).unwrap().is_empty());
    }

    #[test]
    fn corrupt_line_is_skipped_in_order() {
        let log = InMemoryLog::new();
        let good_a = RegistrationRecord::new("a", ContentHasher::hash_text("a"), EpochSeconds::new(1.0));
        let good_b = RegistrationRecord::new("b", ContentHasher::hash_text("b"), EpochSeconds::new(2.0));
        log.append(&good_a).unwrap();
        log.push_raw_line("{\"owner\": \"broken\"");
        log.append(&good_b).unwrap();

        let registry = Registry::new(log);
        assert_eq!(registry.read_all().unwrap(), vec![good_a, good_b]);

        let entries = registry.entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[1].is_corrupt());
    }

    #[test]
    fn file_backed_registry_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        Registry::new(JsonLinesLog::open(&path))
            .register("Ana", "hola mundo")
            .unwrap();

        let reopened = Registry::new(JsonLinesLog::open(&path));
        assert!(reopened
            .exists_hash(&ContentHasher::hash_text("hola mundo"))
            .unwrap());
    }

    #[test]
    fn export_passes_raw_bytes_through() {
        let log = InMemoryLog::new();
        log.push_raw_line("not json");
        let registry = Registry::new(log);
        registry.register("Ana", "doc").unwrap();

        let mut out = Vec::new();
        registry.export(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("not json\n"));
        assert_eq!(text.lines().count(), 2);
    }
}
