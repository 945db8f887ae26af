//! # Ledger Sync Subsystem (VB-01)
//!
//! Keeps the local election cache in step with the voting contract.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Ledger and cache entities, drift detection, the sync report
//! - **Ports Layer** (`ports/`): `LedgerSyncApi` (inbound), `LedgerClient` and
//!   `ElectionCacheStore` (outbound)
//! - **Service Layer** (`service/`): Reconciliation engine and result synchronizer
//! - **Adapters** (`adapters/`): In-memory ledger, JSON-RPC ledger, in-memory and RocksDB stores
//!
//! ## Consistency Model
//!
//! - Every cache mutation sets a field to the ledger's value or replaces a
//!   whole result-row set, so overlapping passes converge.
//! - `finalized` only ever moves from `false` to `true`.
//! - Result rows for one election are replaced in a single atomic unit.
//! - No cache lock is held across a ledger await.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod scheduler;
pub mod service;

// Re-export public API
pub use adapters::memory_ledger::InMemoryLedger;
pub use adapters::memory_store::InMemoryCacheStore;
pub use adapters::rpc::EthRpcLedger;
pub use config::{RpcLedgerConfig, SyncConfig};
pub use domain::entities::{CachedElection, DriftField, ElectionId, LedgerElection, ResultRow};
pub use domain::errors::{LedgerError, StoreError, SyncError};
pub use domain::report::{LedgerStatus, ResultSyncOutcome, SyncDetail, SyncReport, SyncStatus};
pub use ports::inbound::LedgerSyncApi;
pub use ports::outbound::{ElectionCacheStore, LedgerClient, LedgerNetwork, TransactionId};
pub use scheduler::{SyncScheduler, SyncSchedulerHandle};
pub use service::LedgerSyncService;

#[cfg(feature = "rocksdb")]
pub use adapters::rocksdb_store::RocksDbCacheStore;
