//! # Challenge Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default challenge lifetime (5 minutes).
pub const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;

/// Default failed attempts before lockout.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 3;

/// Default interval between expiry sweeps (1 minute).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default realm named in the challenge text.
pub const DEFAULT_REALM: &str = "VotingSystem";

/// Challenge lifecycle settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Seconds a challenge stays valid
    pub ttl_secs: u64,
    /// Failed verifications tolerated before the challenge is evicted
    pub max_failed_attempts: u32,
    /// Seconds between expiry sweeps
    pub sweep_interval_secs: u64,
    /// Application name embedded in the challenge text
    pub realm: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CHALLENGE_TTL_SECS,
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            realm: DEFAULT_REALM.to_owned(),
        }
    }
}

impl ChallengeConfig {
    /// Create a config for testing (short lifetimes).
    pub fn for_testing() -> Self {
        Self {
            ttl_secs: 5,
            max_failed_attempts: 3,
            sweep_interval_secs: 1,
            realm: "TestRealm".to_owned(),
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.ttl_secs).unwrap_or(i64::MAX))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
