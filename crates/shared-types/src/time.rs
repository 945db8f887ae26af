//! # Time Source
//!
//! Clock port shared by every subsystem that reasons about deadlines.

use crate::errors::TimeError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Calendar timestamp used throughout the cache and the challenge registry.
pub type Timestamp = DateTime<Utc>;

/// Shared handle to a clock.
pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Abstract time source.
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualTimeSource {
    now: RwLock<Timestamp>,
}

impl ManualTimeSource {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Create a clock frozen at the given unix second.
    ///
    /// Falls back to the unix epoch when `secs` is out of range.
    pub fn at_unix(secs: u64) -> Self {
        Self::new(from_unix_seconds(secs).unwrap_or_default())
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: Timestamp) {
        *self.now.write() = to;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}

/// Convert ledger epoch seconds into a UTC timestamp.
pub fn from_unix_seconds(secs: u64) -> Result<Timestamp, TimeError> {
    let signed = i64::try_from(secs).map_err(|_| TimeError::OutOfRange(secs))?;
    Utc.timestamp_opt(signed, 0)
        .single()
        .ok_or(TimeError::OutOfRange(secs))
}
