//! # Inbound Ports (Driving Ports / API)
//!
//! What controllers and the scheduler can ask of this subsystem.

use crate::domain::entities::{ElectionId, ResultRow};
use crate::domain::errors::SyncError;
use crate::domain::report::{LedgerStatus, ResultSyncOutcome, SyncReport};
use async_trait::async_trait;

/// Ledger synchronization API.
#[async_trait]
pub trait LedgerSyncApi: Send + Sync {
    /// Run one reconciliation pass over every ledger election.
    ///
    /// Fails only when the ledger's election count cannot be read. Every
    /// per-election failure is reported inside the returned report.
    async fn synchronize_all(&self) -> Result<SyncReport, SyncError>;

    /// Replace the cached result rows of one finalized election.
    async fn synchronize_results(&self, id: ElectionId) -> Result<ResultSyncOutcome, SyncError>;

    /// Run the result synchronizer for every cached election marked finalized.
    async fn synchronize_finalized_results(&self) -> Result<SyncReport, SyncError>;

    /// Cached result rows; syncs from the ledger once if none are cached.
    async fn cached_results(&self, id: ElectionId) -> Result<Vec<ResultRow>, SyncError>;

    /// Contract address, network, and election count.
    async fn ledger_status(&self) -> Result<LedgerStatus, SyncError>;
}
