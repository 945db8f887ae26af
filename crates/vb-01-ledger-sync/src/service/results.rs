//! Result synchronizer.
//!
//! Replaces the cached result rows of a finalized election with the ledger
//! tally. Rows are never patched in place: the whole set for one election is
//! swapped through `ElectionCacheStore::replace_results`.

use super::LedgerSyncService;
use crate::domain::entities::{ElectionId, ResultRow};
use crate::domain::errors::SyncError;
use crate::domain::report::{ResultSyncOutcome, SyncDetail, SyncReport};
use tracing::{debug, error, info, warn};

impl LedgerSyncService {
    pub(super) async fn sync_results(
        &self,
        id: ElectionId,
    ) -> Result<ResultSyncOutcome, SyncError> {
        let ledger = self.ledger.election_info(id).await?;
        if !ledger.finalized {
            debug!(election_id = id, "Election not finalized on ledger");
            return Ok(ResultSyncOutcome::NotFinalized);
        }

        let counts = self.ledger.election_results(id).await?;

        let Some(mut cached) = self.store.find(id).await? else {
            debug!(election_id = id, "Election not cached locally");
            return Ok(ResultSyncOutcome::NotFoundLocally);
        };

        if cached.mark_finalized() {
            self.store.upsert(cached.clone()).await?;
            info!(election_id = id, "Marked cached election finalized");
        }

        let options = cached.options()?;
        if options.len() != counts.len() {
            // Truncated to the shorter side.
            warn!(
                election_id = id,
                options = options.len(),
                counts = counts.len(),
                "Option and tally lengths differ"
            );
        }

        let rows = ResultRow::tally(id, &options, &counts);
        let written = rows.len();
        if self.store.results(id).await? == rows {
            debug!(election_id = id, rows = written, "Results unchanged");
        } else {
            self.store.replace_results(id, rows).await?;
            info!(election_id = id, rows = written, "Replaced cached results");
        }

        Ok(ResultSyncOutcome::Synced {
            name: ledger.name,
            rows: written,
        })
    }

    pub(super) async fn sync_finalized_results(&self) -> Result<SyncReport, SyncError> {
        let finalized: Vec<_> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|e| e.finalized)
            .collect();
        info!(total = finalized.len(), "Syncing results of finalized elections");

        let mut report = SyncReport::new(finalized.len() as u64);
        for election in finalized {
            match self.sync_results(election.id).await {
                Ok(outcome) => {
                    let name = match &outcome {
                        ResultSyncOutcome::Synced { name, .. } => name.clone(),
                        _ => election.name.clone(),
                    };
                    report.record(SyncDetail::new(election.id, name, outcome.status()));
                }
                Err(err) => {
                    error!(election_id = election.id, error = %err, "Result sync failed");
                    report.record(SyncDetail::failed(election.id, Some(election.name), &err));
                }
            }
        }
        Ok(report)
    }
}
