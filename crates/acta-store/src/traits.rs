use std::io::Write;

use crate::error::StoreResult;
use crate::scan::{ScanItem, ScanIter};

/// Append-only log of records of type `T`.
///
/// All implementations must satisfy these invariants:
/// - Records are never modified or removed once appended.
/// - `scan` yields lines in insertion order.
/// - A line that fails to parse is yielded as [`ScanItem::Corrupt`]; only I/O
///   failures are returned as `Err`.
/// - A log that has never been written to scans as empty.
pub trait RecordLog<T>: Send + Sync {
    /// Append one record as a single line.
    fn append(&self, record: &T) -> StoreResult<()>;

    /// Lazily scan every non-blank line, oldest first.
    fn scan(&self) -> StoreResult<ScanIter<'_, T>>;

    /// Copy the raw log bytes to `out`, unmodified. Returns bytes written.
    fn export(&self, out: &mut dyn Write) -> StoreResult<u64>;

    /// All records that parse, oldest first.
    fn records(&self) -> StoreResult<Vec<T>> {
        let mut records = Vec::new();
        for item in self.scan()? {
            if let ScanItem::Record(record) = item? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// The first record matching `pred`, scanning oldest first.
    fn find(&self, pred: &mut dyn FnMut(&T) -> bool) -> StoreResult<Option<T>> {
        for item in self.scan()? {
            if let ScanItem::Record(record) = item? {
                if pred(&record) {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Returns `true` if any record matches `pred`.
    fn any(&self, pred: &mut dyn FnMut(&T) -> bool) -> StoreResult<bool> {
        Ok(self.find(pred)?.is_some())
    }

    /// Line numbers and raw text of every line that failed to parse.
    fn corrupt_lines(&self) -> StoreResult<Vec<(usize, String)>> {
        let mut corrupt = Vec::new();
        for item in self.scan()? {
            if let ScanItem::Corrupt { line, raw } = item? {
                corrupt.push((line, raw));
            }
        }
        Ok(corrupt)
    }
}
