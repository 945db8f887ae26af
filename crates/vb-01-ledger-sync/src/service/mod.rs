//! # Ledger Sync Service
//!
//! Application service implementing `LedgerSyncApi` over the two outbound
//! ports.
//!
//! ## Architecture
//!
//! - `reconcile` - the reconciliation pass (`synchronize_all`)
//! - `results` - the result synchronizer and the finalized-results sweep
//!
//! The service holds no state of its own beyond its collaborators, so any
//! number of passes may run against it concurrently.

mod reconcile;
mod results;

use crate::domain::entities::{ElectionId, ResultRow};
use crate::domain::errors::SyncError;
use crate::domain::report::{LedgerStatus, ResultSyncOutcome, SyncReport};
use crate::ports::inbound::LedgerSyncApi;
use crate::ports::outbound::{ElectionCacheStore, LedgerClient};
use async_trait::async_trait;
use shared_types::{SharedTimeSource, SystemTimeSource};
use std::sync::Arc;
use tracing::debug;

/// Reconciliation engine and result synchronizer.
pub struct LedgerSyncService {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn ElectionCacheStore>,
    clock: SharedTimeSource,
}

impl LedgerSyncService {
    /// Create a service using the system clock.
    pub fn new(ledger: Arc<dyn LedgerClient>, store: Arc<dyn ElectionCacheStore>) -> Self {
        Self::with_clock(ledger, store, Arc::new(SystemTimeSource))
    }

    /// Create a service with an injected clock.
    pub fn with_clock(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn ElectionCacheStore>,
        clock: SharedTimeSource,
    ) -> Self {
        Self {
            ledger,
            store,
            clock,
        }
    }

    /// The cache this service writes to.
    pub fn store(&self) -> &Arc<dyn ElectionCacheStore> {
        &self.store
    }
}

#[async_trait]
impl LedgerSyncApi for LedgerSyncService {
    async fn synchronize_all(&self) -> Result<SyncReport, SyncError> {
        self.reconcile_all().await
    }

    async fn synchronize_results(&self, id: ElectionId) -> Result<ResultSyncOutcome, SyncError> {
        self.sync_results(id).await
    }

    async fn synchronize_finalized_results(&self) -> Result<SyncReport, SyncError> {
        self.sync_finalized_results().await
    }

    async fn cached_results(&self, id: ElectionId) -> Result<Vec<ResultRow>, SyncError> {
        let rows = self.store.results(id).await?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        debug!(election_id = id, "No cached results, syncing from ledger");
        self.sync_results(id).await?;
        Ok(self.store.results(id).await?)
    }

    async fn ledger_status(&self) -> Result<LedgerStatus, SyncError> {
        let network = self.ledger.network().await?;
        let election_count = self.ledger.election_count().await?;
        Ok(LedgerStatus {
            contract_address: network.contract_address,
            network_name: network.network_name,
            election_count,
        })
    }
}
