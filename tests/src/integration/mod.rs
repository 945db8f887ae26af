//! # Integration Tests
//!
//! Cross-crate scenarios. Every test builds its own ledger, cache, and
//! registry; nothing is shared between tests.

pub mod authentication;
pub mod reconciliation;
pub mod runtime;
