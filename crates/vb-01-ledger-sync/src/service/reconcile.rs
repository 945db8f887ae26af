//! Reconciliation pass.
//!
//! Walks ledger indices `0..count`, brings each cache row in line with the
//! ledger, and cascades into the result synchronizer once an election's
//! results are due. One election's failure never stops the pass.

use super::LedgerSyncService;
use crate::domain::entities::{CachedElection, ElectionId, LedgerElection};
use crate::domain::errors::SyncError;
use crate::domain::report::{SyncDetail, SyncReport, SyncStatus};
use tracing::{debug, error, info, warn};

impl LedgerSyncService {
    pub(super) async fn reconcile_all(&self) -> Result<SyncReport, SyncError> {
        let count = self.ledger.election_count().await.map_err(|e| {
            error!(error = %e, "Cannot read election count, aborting sync pass");
            SyncError::from(e)
        })?;
        info!(total = count, "Starting ledger sync pass");

        let mut report = SyncReport::new(count);
        for id in 0..count {
            let ledger = match self.ledger.election_info(id).await {
                Ok(ledger) => ledger,
                Err(e) => {
                    let err = SyncError::from(e);
                    error!(election_id = id, error = %err, "Failed to read election");
                    report.record(SyncDetail::failed(id, None, &err));
                    continue;
                }
            };

            match self.reconcile_one(id, &ledger).await {
                Ok(status) => report.record(SyncDetail::new(id, ledger.name.clone(), status)),
                Err(err) => {
                    error!(election_id = id, error = %err, "Failed to sync election");
                    report.record(SyncDetail::failed(id, Some(ledger.name.clone()), &err));
                    continue;
                }
            }

            self.cascade_results(id, &ledger, &mut report).await;
        }

        info!(
            total = report.total_count,
            synced = report.synced_count,
            errors = report.error_count(),
            "Ledger sync pass finished"
        );
        Ok(report)
    }

    /// Create or update the cache row for one election.
    async fn reconcile_one(
        &self,
        id: ElectionId,
        ledger: &LedgerElection,
    ) -> Result<SyncStatus, SyncError> {
        let Some(mut cached) = self.store.find(id).await? else {
            let created = CachedElection::from_ledger(id, ledger, self.clock.now())?;
            self.store.upsert(created).await?;
            info!(election_id = id, name = %ledger.name, "Cached new election");
            return Ok(SyncStatus::Created);
        };

        let drift = cached.drift(ledger)?;
        if drift.is_empty() {
            debug!(election_id = id, "Election unchanged");
            return Ok(SyncStatus::NoChanges);
        }

        cached.apply(ledger)?;
        self.store.upsert(cached).await?;
        info!(election_id = id, fields = ?drift, "Updated cached election");
        Ok(SyncStatus::Updated)
    }

    /// Run the result synchronizer if due. Failures land in `result_errors`.
    async fn cascade_results(
        &self,
        id: ElectionId,
        ledger: &LedgerElection,
        report: &mut SyncReport,
    ) {
        let due = match ledger.results_due(id, self.clock.now()) {
            Ok(due) => due,
            Err(err) => {
                warn!(election_id = id, error = %err, "Cannot decide whether results are due");
                report.record_result_failure(SyncDetail::failed(
                    id,
                    Some(ledger.name.clone()),
                    &err,
                ));
                return;
            }
        };
        if !due {
            return;
        }

        match self.sync_results(id).await {
            Ok(outcome) => {
                debug!(election_id = id, status = ?outcome.status(), "Result sync finished");
            }
            Err(err) => {
                warn!(election_id = id, error = %err, "Result sync failed");
                report.record_result_failure(SyncDetail::failed(
                    id,
                    Some(ledger.name.clone()),
                    &err,
                ));
            }
        }
    }
}
