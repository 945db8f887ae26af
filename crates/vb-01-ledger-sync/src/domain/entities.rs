//! # Domain Entities
//!
//! The ledger's view of an election, the cache's view of the same election,
//! and the per-option result rows derived from a finalized tally.

use super::errors::{StoreError, SyncError};
use serde::{Deserialize, Serialize};
use shared_types::{from_unix_seconds, Timestamp};

/// Ledger index of an election. The cache reuses it as primary key.
pub type ElectionId = u64;

// =============================================================================
// Ledger side (read-only)
// =============================================================================

/// Election as reported by the voting contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerElection {
    /// Display name (opaque)
    pub name: String,
    /// Free-form description (opaque)
    pub description: String,
    /// Voting opens, unix seconds
    pub start_time: u64,
    /// Voting closes, unix seconds
    pub end_time: u64,
    /// Option labels in ballot order
    pub options: Vec<String>,
    /// Tally is permanent on-chain
    pub finalized: bool,
}

impl LedgerElection {
    /// Start time as a calendar timestamp.
    pub fn start_at(&self, id: ElectionId) -> Result<Timestamp, SyncError> {
        from_unix_seconds(self.start_time).map_err(|_| SyncError::InvalidTimestamp {
            id,
            field: "start_time",
            value: self.start_time,
        })
    }

    /// End time as a calendar timestamp.
    pub fn end_at(&self, id: ElectionId) -> Result<Timestamp, SyncError> {
        from_unix_seconds(self.end_time).map_err(|_| SyncError::InvalidTimestamp {
            id,
            field: "end_time",
            value: self.end_time,
        })
    }

    /// Whether the result synchronizer should be run for this election.
    ///
    /// True once the ledger has finalized, or once voting has closed even if
    /// nobody has finalized on-chain yet.
    pub fn results_due(&self, id: ElectionId, now: Timestamp) -> Result<bool, SyncError> {
        if self.finalized {
            return Ok(true);
        }
        Ok(now > self.end_at(id)?)
    }
}

// =============================================================================
// Cache side
// =============================================================================

/// Fields compared during reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftField {
    Name,
    Description,
    StartTime,
    EndTime,
    Finalized,
    Options,
}

/// Election row in the local query cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedElection {
    /// Mirrors the ledger index; never renumbered
    pub id: ElectionId,
    pub name: String,
    pub description: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Option labels as a JSON array of strings
    pub options_json: String,
    /// Monotonic: never reset once true
    pub finalized: bool,
    /// When this row was first created locally
    pub created_at: Timestamp,
}

impl CachedElection {
    /// Build the cache row for an election seen for the first time.
    pub fn from_ledger(
        id: ElectionId,
        ledger: &LedgerElection,
        created_at: Timestamp,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            id,
            name: ledger.name.clone(),
            description: ledger.description.clone(),
            start_time: ledger.start_at(id)?,
            end_time: ledger.end_at(id)?,
            options_json: encode_options(&ledger.options)?,
            finalized: ledger.finalized,
            created_at,
        })
    }

    /// Decode the cached option labels.
    pub fn options(&self) -> Result<Vec<String>, SyncError> {
        serde_json::from_str(&self.options_json).map_err(|e| SyncError::CorruptOptions {
            id: self.id,
            reason: e.to_string(),
        })
    }

    /// Fields where this row disagrees with the ledger.
    ///
    /// A cached `finalized = true` against a ledger `false` is not drift:
    /// finalization never reverts. Options that no longer decode count as
    /// drift so the next overwrite repairs them.
    pub fn drift(&self, ledger: &LedgerElection) -> Result<Vec<DriftField>, SyncError> {
        let mut fields = Vec::new();

        if self.name != ledger.name {
            fields.push(DriftField::Name);
        }
        if self.description != ledger.description {
            fields.push(DriftField::Description);
        }
        if self.start_time != ledger.start_at(self.id)? {
            fields.push(DriftField::StartTime);
        }
        if self.end_time != ledger.end_at(self.id)? {
            fields.push(DriftField::EndTime);
        }
        if ledger.finalized && !self.finalized {
            fields.push(DriftField::Finalized);
        }
        match self.options() {
            Ok(options) if options == ledger.options => {}
            _ => fields.push(DriftField::Options),
        }

        Ok(fields)
    }

    /// Overwrite every ledger-owned field with the ledger's value.
    pub fn apply(&mut self, ledger: &LedgerElection) -> Result<(), SyncError> {
        let start_time = ledger.start_at(self.id)?;
        let end_time = ledger.end_at(self.id)?;
        let options_json = encode_options(&ledger.options)?;

        self.name = ledger.name.clone();
        self.description = ledger.description.clone();
        self.start_time = start_time;
        self.end_time = end_time;
        self.options_json = options_json;
        self.finalized |= ledger.finalized;
        Ok(())
    }

    /// Mark finalized. Returns `true` if the flag changed.
    pub fn mark_finalized(&mut self) -> bool {
        let changed = !self.finalized;
        self.finalized = true;
        changed
    }
}

fn encode_options(options: &[String]) -> Result<String, SyncError> {
    serde_json::to_string(options)
        .map_err(|e| SyncError::Store(StoreError::Serialization(e.to_string())))
}

// =============================================================================
// Result rows
// =============================================================================

/// Vote count for one option of one election.
///
/// Identity is `(election_id, option_index)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub election_id: ElectionId,
    pub option_index: u32,
    pub option_name: String,
    pub vote_count: u64,
}

impl ResultRow {
    /// Pair ledger counts with cached option labels.
    ///
    /// Produces `min(options.len(), counts.len())` rows; the longer side is
    /// truncated.
    pub fn tally(election_id: ElectionId, options: &[String], counts: &[u64]) -> Vec<ResultRow> {
        options
            .iter()
            .zip(counts)
            .zip(0u32..)
            .map(|((name, count), index)| ResultRow {
                election_id,
                option_index: index,
                option_name: name.clone(),
                vote_count: *count,
            })
            .collect()
    }
}
