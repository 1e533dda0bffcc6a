use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::StoreResult;

/// One non-blank line of a record log.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanItem<T> {
    /// The line parsed as a record.
    Record(T),
    /// The line could not be parsed; `raw` is the line as found.
    Corrupt { line: usize, raw: String },
}

impl<T> ScanItem<T> {
    /// Returns `true` if this line failed to parse.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Lazy, insertion-ordered sequence of scanned lines.
pub type ScanIter<'a, T> = Box<dyn Iterator<Item = StoreResult<ScanItem<T>>> + 'a>;

/// Decode one raw line. Returns `None` for blank lines.
///
/// `line` is 1-based and counts every physical line, blank or not, so it can
/// be used to locate the entry in the file.
pub(crate) fn decode_line<T: DeserializeOwned>(line: usize, raw: &str) -> Option<ScanItem<T>> {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<T>(raw) {
        Ok(record) => Some(ScanItem::Record(record)),
        Err(e) => {
            warn!(line, error = %e, "unparsable record line; skipping");
            Some(ScanItem::Corrupt {
                line,
                raw: raw.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Row {
        n: u32,
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(decode_line::<Row>(1, "").is_none());
        assert!(decode_line::<Row>(2, "   ").is_none());
        assert!(decode_line::<Row>(3, "\r").is_none());
    }

    #[test]
    fn valid_line_decodes() {
        assert_eq!(
            decode_line::<Row>(1, "{\"n\": 7}"),
            Some(ScanItem::Record(Row { n: 7 }))
        );
    }

    #[test]
    fn carriage_return_is_stripped() {
        assert_eq!(
            decode_line::<Row>(1, "{\"n\": 7}\r"),
            Some(ScanItem::Record(Row { n: 7 }))
        );
    }

    #[test]
    fn malformed_line_keeps_raw_text() {
        assert_eq!(
            decode_line::<Row>(4, "{\"n\": "),
            Some(ScanItem::Corrupt {
                line: 4,
                raw: "{\"n\": ".into()
            })
        );
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let item = decode_line::<Row>(1, "{\"m\": 1}").unwrap();
        assert!(item.is_corrupt());
    }
}
