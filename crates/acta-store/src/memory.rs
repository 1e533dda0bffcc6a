use std::io::Write;
use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::scan::{decode_line, ScanIter};
use crate::traits::RecordLog;

/// In-memory record log.
///
/// Keeps the serialized lines rather than the records themselves, so scans go
/// through the same decode path as the file backend and raw (possibly
/// malformed) lines can be injected with [`InMemoryLog::push_raw_line`].
pub struct InMemoryLog<T> {
    lines: RwLock<Vec<String>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> InMemoryLog<T> {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self {
            lines: RwLock::new(Vec::new()),
            _record: PhantomData,
        }
    }

    /// Append a raw line without serializing a record.
    pub fn push_raw_line(&self, raw: impl Into<String>) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(raw.into());
    }

    /// Number of stored lines, including malformed ones.
    pub fn line_count(&self) -> usize {
        self.lines.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }
}

impl<T> Default for InMemoryLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for InMemoryLog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLog")
            .field("lines", &self.line_count())
            .finish()
    }
}

impl<T> RecordLog<T> for InMemoryLog<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn append(&self, record: &T) -> StoreResult<()> {
        let line =
            serde_json::to_string(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.push_raw_line(line);
        Ok(())
    }

    fn scan(&self) -> StoreResult<ScanIter<'_, T>> {
        let snapshot = self
            .lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Ok(Box::new(
            snapshot
                .into_iter()
                .enumerate()
                .filter_map(|(index, raw)| decode_line(index + 1, &raw))
                .map(Ok),
        ))
    }

    fn export(&self, out: &mut dyn Write) -> StoreResult<u64> {
        let lines = self.lines.read().unwrap_or_else(PoisonError::into_inner);
        let mut written = 0u64;
        for line in lines.iter() {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            written += line.len() as u64 + 1;
        }
        Ok(written)
    }
}
