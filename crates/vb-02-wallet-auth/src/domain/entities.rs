//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;
use subtle::ConstantTimeEq;

/// Case-insensitive identity (wallet address) used as registry key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(identity: &str) -> Self {
        Self(identity.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pending challenge for one identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeRecord {
    /// Exact text the wallet must sign
    pub value: String,
    pub expires_at: Timestamp,
    pub failed_attempts: u32,
}

impl ChallengeRecord {
    pub fn new(value: String, expires_at: Timestamp) -> Self {
        Self {
            value,
            expires_at,
            failed_attempts: 0,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Constant-time comparison against the presented value.
    pub fn matches(&self, presented: &str) -> bool {
        self.value.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

/// Result of a successful authentication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedWallet {
    pub wallet_address: String,
    pub is_new_user: bool,
}

/// Wallet known to the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredWallet {
    pub wallet_address: IdentityKey,
    pub registered_at: Timestamp,
}
