//! # Domain Layer
//!
//! Ledger and cache entities with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod report;
