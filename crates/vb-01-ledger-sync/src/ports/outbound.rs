//! # Outbound Ports (Driven Ports / SPI)
//!
//! The two collaborators this subsystem depends on: the ledger and the local
//! cache store.

use crate::domain::entities::{CachedElection, ElectionId, LedgerElection, ResultRow};
use crate::domain::errors::{LedgerError, StoreError};
use async_trait::async_trait;

/// Hash of a ledger transaction, as returned by the ledger.
pub type TransactionId = String;

/// Where the ledger lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerNetwork {
    /// Voting contract address
    pub contract_address: String,
    /// Human-readable network name
    pub network_name: String,
}

/// Read/write accessor to the voting contract.
///
/// Calls may block on network I/O. Implementations own their own timeouts.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Authoritative number of elections. Valid indices are `0..count`.
    async fn election_count(&self) -> Result<u64, LedgerError>;

    /// Election metadata at `id`.
    async fn election_info(&self, id: ElectionId) -> Result<LedgerElection, LedgerError>;

    /// Per-option vote counts, ordered as the options were declared at call time.
    async fn election_results(&self, id: ElectionId) -> Result<Vec<u64>, LedgerError>;

    /// Finalize the tally on-chain.
    ///
    /// Invoked by operator-facing controllers, never by reconciliation.
    async fn finalize(&self, id: ElectionId) -> Result<TransactionId, LedgerError>;

    /// Contract address and network name.
    async fn network(&self) -> Result<LedgerNetwork, LedgerError>;
}

/// Persistence for cached elections and their result rows.
///
/// Individual calls are last-writer-wins per row. `delete_result_rows` and
/// `insert_result_row` are the row primitives; `replace_results` is their
/// composition and must be atomic: readers see either the old row set or the
/// new one, never an empty or partial set in between.
#[async_trait]
pub trait ElectionCacheStore: Send + Sync {
    /// Load one election.
    async fn find(&self, id: ElectionId) -> Result<Option<CachedElection>, StoreError>;

    /// Insert or overwrite one election.
    async fn upsert(&self, election: CachedElection) -> Result<(), StoreError>;

    /// All cached elections ordered by id.
    async fn list(&self) -> Result<Vec<CachedElection>, StoreError>;

    /// Result rows for one election ordered by option index.
    async fn results(&self, id: ElectionId) -> Result<Vec<ResultRow>, StoreError>;

    /// Delete every result row of `id`. Returns the number removed.
    async fn delete_result_rows(&self, id: ElectionId) -> Result<usize, StoreError>;

    /// Insert one result row. Fails with `DuplicateResultRow` if the
    /// `(election, option)` pair already exists.
    async fn insert_result_row(&self, row: ResultRow) -> Result<(), StoreError>;

    /// Delete every result row of `id`, then insert `rows`, as one unit.
    async fn replace_results(&self, id: ElectionId, rows: Vec<ResultRow>)
        -> Result<(), StoreError>;
}
