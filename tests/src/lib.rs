//! # Vote-Bridge Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── bridge_benchmarks.rs   # Signature recovery, reconciliation pass
//! └── src/integration/
//!     ├── reconciliation.rs      # Ledger → cache scenarios and properties
//!     ├── authentication.rs      # Challenge-response scenarios and properties
//!     └── runtime.rs             # HTTP controllers over the wired container
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p vb-tests
//!
//! # By area
//! cargo test -p vb-tests integration::reconciliation
//! cargo test -p vb-tests integration::authentication
//!
//! # Persistent cache store
//! cargo test -p vb-tests --features rocksdb
//!
//! # Benchmarks
//! cargo bench -p vb-tests
//! ```

pub mod integration;
