//! # Sync Report
//!
//! What a reconciliation pass hands back to its caller. The JSON shape
//! `{totalCount, syncedCount, details: [{id, name, status, error?}]}` is the
//! contract the HTTP controller and end-to-end tests rely on.

use super::entities::ElectionId;
use super::errors::SyncError;
use serde::{Deserialize, Serialize};

/// Outcome label for one election in a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// First sight of this ledger index; cache row created
    Created,
    /// Cache row differed and was overwritten
    Updated,
    /// Cache row already matched the ledger
    NoChanges,
    /// Result rows replaced from the ledger tally
    ResultsSynced,
    /// Ledger has not finalized the tally yet
    NotFinalized,
    /// No cache row to attach results to
    NotFound,
    /// Processing this election failed
    Error,
}

impl SyncStatus {
    /// Whether this outcome wrote to the cache.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            SyncStatus::Created | SyncStatus::Updated | SyncStatus::ResultsSynced
        )
    }
}

/// One line of a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDetail {
    pub id: ElectionId,
    /// `None` when the failure happened before the name was known
    pub name: Option<String>,
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncDetail {
    /// Successful outcome.
    pub fn new(id: ElectionId, name: impl Into<String>, status: SyncStatus) -> Self {
        Self {
            id,
            name: Some(name.into()),
            status,
            error: None,
        }
    }

    /// Failed outcome.
    pub fn failed(id: ElectionId, name: Option<String>, error: &SyncError) -> Self {
        Self {
            id,
            name,
            status: SyncStatus::Error,
            error: Some(error.to_string()),
        }
    }
}

/// Result of a reconciliation pass or a results sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Elections the pass was asked to look at
    pub total_count: u64,
    /// Elections whose cache rows were written
    pub synced_count: u64,
    pub details: Vec<SyncDetail>,
    /// Result-sync failures that did not change an election's own status
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result_errors: Vec<SyncDetail>,
}

impl SyncReport {
    /// Empty report for a pass over `total_count` elections.
    pub fn new(total_count: u64) -> Self {
        Self {
            total_count,
            ..Self::default()
        }
    }

    /// Append a detail line, counting it if it wrote to the cache.
    pub fn record(&mut self, detail: SyncDetail) {
        if detail.status.is_write() {
            self.synced_count += 1;
        }
        self.details.push(detail);
    }

    /// Note a result-sync failure without touching `details`.
    pub fn record_result_failure(&mut self, detail: SyncDetail) {
        self.result_errors.push(detail);
    }

    /// Status recorded for an election, if any.
    pub fn status_of(&self, id: ElectionId) -> Option<SyncStatus> {
        self.details.iter().find(|d| d.id == id).map(|d| d.status)
    }

    /// Number of `error` lines.
    pub fn error_count(&self) -> usize {
        self.details
            .iter()
            .filter(|d| d.status == SyncStatus::Error)
            .count()
    }
}

/// Outcome of the result synchronizer for one election.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultSyncOutcome {
    /// Ledger says the tally is not final; nothing written.
    NotFinalized,
    /// No cache row exists for this election; nothing written.
    NotFoundLocally,
    /// Result rows replaced.
    Synced {
        /// Election name as reported by the ledger
        name: String,
        /// Rows written
        rows: usize,
    },
}

impl ResultSyncOutcome {
    /// Report label.
    pub fn status(&self) -> SyncStatus {
        match self {
            ResultSyncOutcome::NotFinalized => SyncStatus::NotFinalized,
            ResultSyncOutcome::NotFoundLocally => SyncStatus::NotFound,
            ResultSyncOutcome::Synced { .. } => SyncStatus::ResultsSynced,
        }
    }

    /// Human-readable summary.
    pub fn message(&self, id: ElectionId) -> String {
        match self {
            ResultSyncOutcome::NotFinalized => {
                format!("Election {id} is not finalized yet on the ledger")
            }
            ResultSyncOutcome::NotFoundLocally => {
                format!("Election {id} not found locally")
            }
            ResultSyncOutcome::Synced { name, rows } => {
                format!("Results for election {id} ({name}) synced: {rows} options")
            }
        }
    }
}

/// Ledger connection summary for the status endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub contract_address: String,
    pub network_name: String,
    pub election_count: u64,
}
