//! # Sync Errors
//!
//! Error taxonomy for ledger reads, cache writes, and per-election sync.

use super::entities::ElectionId;
use thiserror::Error;

/// Errors from the ledger collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger could not be reached (connection, timeout, HTTP status).
    #[error("Ledger transport failure: {0}")]
    Transport(String),

    /// The ledger has no election at this index.
    #[error("Election {id} does not exist on the ledger (count {count})")]
    ElectionNotFound {
        /// Requested index
        id: ElectionId,
        /// Election count reported by the ledger
        count: u64,
    },

    /// The ledger answered with data that could not be decoded.
    #[error("Could not decode ledger response: {0}")]
    Decode(String),

    /// The ledger refused the call (revert, JSON-RPC error object).
    #[error("Ledger rejected call: {0}")]
    Rejected(String),
}

/// Errors from the local cache store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying storage failed.
    #[error("Cache store I/O error: {0}")]
    Io(String),

    /// A stored value could not be encoded or decoded.
    #[error("Cache store serialization error: {0}")]
    Serialization(String),

    /// A result row with this identity already exists.
    #[error("Duplicate result row for election {election_id}, option {option_index}")]
    DuplicateResultRow {
        /// Election the row belongs to
        election_id: ElectionId,
        /// Option index within the election
        option_index: u32,
    },
}

/// Errors while synchronizing one election.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Ledger call failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Cache store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A ledger epoch could not be turned into a timestamp.
    #[error("Election {id}: {field} timestamp {value} is out of range")]
    InvalidTimestamp {
        /// Election being synced
        id: ElectionId,
        /// `start_time` or `end_time`
        field: &'static str,
        /// Raw epoch seconds
        value: u64,
    },

    /// The cached option list is not a JSON array of strings.
    #[error("Election {id}: cached options are corrupt: {reason}")]
    CorruptOptions {
        /// Election being synced
        id: ElectionId,
        /// Parser message
        reason: String,
    },
}

impl SyncError {
    /// Whether this failure means the ledger itself was unreachable.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Ledger(LedgerError::Transport(_)))
    }
}
