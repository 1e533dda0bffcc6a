use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Split, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::scan::{decode_line, ScanItem, ScanIter};
use crate::traits::RecordLog;

/// Flush/sync strategy for appends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// `fsync` after every append (safest, highest latency).
    EveryWrite,
    /// Rely on OS page-cache buffering.
    #[default]
    OsDefault,
}

/// File-backed record log, one JSON object per line.
///
/// On-disk format:
/// ```text
/// {"field": "value", ...}\n
/// {"field": "value", ...}\n
/// ```
///
/// Opening a log does not touch the filesystem. The file (and its parent
/// directory) is created by the first append; until then the log scans as
/// empty and exports nothing.
pub struct JsonLinesLog<T> {
    path: PathBuf,
    sync_mode: SyncMode,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonLinesLog<T> {
    /// A log backed by the file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_mode: SyncMode::default(),
            _record: PhantomData,
        }
    }

    /// Set the sync strategy used by `append`.
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    /// Path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn open_for_read(&self) -> StoreResult<Option<File>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl<T> std::fmt::Debug for JsonLinesLog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesLog")
            .field("path", &self.path)
            .field("sync_mode", &self.sync_mode)
            .finish()
    }
}

impl<T> RecordLog<T> for JsonLinesLog<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn append(&self, record: &T) -> StoreResult<()> {
        let json =
            serde_json::to_string(record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        // Terminate an unterminated tail so the record starts its own line.
        let mut line = String::with_capacity(json.len() + 2);
        if missing_final_newline(&mut file)? {
            warn!(path = %self.path.display(), "log did not end with a newline; terminating last line");
            line.push('\n');
        }
        line.push_str(&json);
        line.push('\n');

        // Whole line in a single write.
        file.write_all(line.as_bytes())?;

        if matches!(self.sync_mode, SyncMode::EveryWrite) {
            file.sync_all()?;
        }

        debug!(path = %self.path.display(), len = line.len(), "record appended");
        Ok(())
    }

    fn scan(&self) -> StoreResult<ScanIter<'_, T>> {
        match self.open_for_read()? {
            Some(file) => Ok(Box::new(LineScanner {
                lines: BufReader::new(file).split(b'\n'),
                line: 0,
                _record: PhantomData,
            })),
            None => {
                debug!(path = %self.path.display(), "log file absent; scanning as empty");
                Ok(Box::new(std::iter::empty()))
            }
        }
    }

    fn export(&self, out: &mut dyn Write) -> StoreResult<u64> {
        match self.open_for_read()? {
            Some(mut file) => {
                let copied = io::copy(&mut file, out)?;
                debug!(path = %self.path.display(), bytes = copied, "log exported");
                Ok(copied)
            }
            None => Ok(0),
        }
    }
}

/// Returns `true` if the file is non-empty and its last byte is not `\n`.
fn missing_final_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Streams lines from the backing file, decoding each on demand.
///
/// Lines are split on raw bytes so that invalid UTF-8 surfaces as a corrupt
/// line instead of aborting the scan.
struct LineScanner<T> {
    lines: Split<BufReader<File>>,
    line: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for LineScanner<T> {
    type Item = StoreResult<ScanItem<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let bytes = match self.lines.next()? {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match String::from_utf8(bytes) {
                Ok(raw) => {
                    if let Some(item) = decode_line(self.line, &raw) {
                        return Some(Ok(item));
                    }
                }
                Err(e) => {
                    warn!(line = self.line, "line is not valid UTF-8; skipping");
                    return Some(Ok(ScanItem::Corrupt {
                        line: self.line,
                        raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    }));
                }
            }
        }
    }
}
