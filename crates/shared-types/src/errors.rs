//! # Error Types
//!
//! Errors raised by the shared primitives.

use thiserror::Error;

/// Errors converting between ledger epochs and calendar timestamps.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeError {
    /// The epoch value cannot be represented as a UTC timestamp.
    #[error("Epoch seconds out of range: {0}")]
    OutOfRange(u64),
}
