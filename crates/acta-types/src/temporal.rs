use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in fractional seconds since the UNIX epoch.
///
/// Stored as a bare JSON number so ledger lines stay readable by any tool
/// that understands `{"time": 1718000000.123}`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochSeconds(pub f64);

impl EpochSeconds {
    /// Create a timestamp from raw seconds.
    pub const fn new(secs: f64) -> Self {
        Self(secs)
    }

    /// Current wall-clock time. A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self(secs)
    }

    /// The raw seconds value.
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Whole seconds and sub-second nanoseconds, for calendar conversion.
    pub fn split(&self) -> (i64, u32) {
        let whole = self.0.floor();
        let nanos = ((self.0 - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
        (whole as i64, nanos)
    }
}

impl fmt::Debug for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochSeconds({:.3})", self.0)
    }
}

impl fmt::Display for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
