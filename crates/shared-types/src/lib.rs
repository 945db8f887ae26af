//! # Shared Types Crate
//!
//! Primitives used by more than one subsystem.
//!
//! ## Design Principles
//!
//! - **Injectable time**: nothing reads the wall clock directly; services take
//!   an `Arc<dyn TimeSource>` so expiry and "election has ended" decisions are
//!   deterministic under test.
//! - **Epoch seconds at the edge**: the ledger speaks unix seconds, the cache
//!   speaks `DateTime<Utc>`. Conversion happens in one place.

pub mod errors;
pub mod time;

pub use errors::TimeError;
pub use time::{
    from_unix_seconds, ManualTimeSource, SharedTimeSource, SystemTimeSource, TimeSource,
    Timestamp,
};
