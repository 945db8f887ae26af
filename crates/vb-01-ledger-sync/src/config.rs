//! # Ledger Sync Configuration
//!
//! Settings for the reconciliation scheduler and the JSON-RPC ledger adapter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default reconciliation interval (5 minutes).
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;

/// Default per-request timeout for ledger RPC calls.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Reconciliation scheduling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between background passes.
    pub interval_secs: u64,

    /// Whether the background task runs at all.
    pub enabled: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            enabled: true,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (short interval).
    pub fn for_testing() -> Self {
        Self {
            interval_secs: 1,
            enabled: true,
        }
    }

    /// Interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// JSON-RPC ledger endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcLedgerConfig {
    /// HTTP(S) URL of the JSON-RPC node. `None` selects the in-memory ledger.
    pub rpc_url: Option<String>,

    /// Voting contract address (`0x` + 40 hex).
    pub contract_address: String,

    /// Node-managed account used for `finalizeElection` transactions.
    pub sender: Option<String>,

    /// Per-request timeout in seconds. `0` means the default.
    pub timeout_secs: u64,
}

impl RpcLedgerConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }
}
