//! # Challenge Registry
//!
//! Identity → pending challenge, with per-key atomic transitions.
//!
//! ```text
//! {none} --issue--> {pending, attempts=0}
//! {pending} --verify ok--> {none}
//! {pending, attempts<max} --verify fail--> {pending, attempts+1}
//! {pending, attempts>=max | expired} --verify / sweep--> {none}
//! ```
//!
//! State is read and written under the key's `DashMap` entry, but signature
//! recovery runs with no guard held. The transition is applied on re-entry
//! only if the stored value is still the one that was checked; a challenge
//! re-issued in between turns the attempt into a plain `false`.

use crate::config::ChallengeConfig;
use crate::domain::challenge::{challenge_text, generate_nonce};
use crate::domain::entities::{ChallengeRecord, IdentityKey};
use crate::ports::inbound::ChallengeAuthApi;
use crate::ports::outbound::SignatureVerifier;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{SharedTimeSource, SystemTimeSource, Timestamp};
use std::sync::Arc;
use tracing::debug;

/// In-memory keyed store of pending challenges.
pub struct ChallengeRegistry {
    records: DashMap<IdentityKey, ChallengeRecord>,
    verifier: Arc<dyn SignatureVerifier>,
    clock: SharedTimeSource,
    config: ChallengeConfig,
}

impl ChallengeRegistry {
    /// Create a registry on the system clock.
    pub fn new(verifier: Arc<dyn SignatureVerifier>, config: ChallengeConfig) -> Self {
        Self::with_clock(verifier, config, Arc::new(SystemTimeSource))
    }

    /// Create a registry with an injected clock.
    pub fn with_clock(
        verifier: Arc<dyn SignatureVerifier>,
        config: ChallengeConfig,
        clock: SharedTimeSource,
    ) -> Self {
        Self {
            records: DashMap::new(),
            verifier,
            clock,
            config,
        }
    }

    /// Drop every expired record. Returns the number removed.
    pub fn remove_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before.saturating_sub(self.records.len())
    }

    /// Number of identities with a pending challenge.
    pub fn pending_count(&self) -> usize {
        self.records.len()
    }

    /// Failed attempts recorded against the pending challenge of `identity`.
    pub fn failed_attempts(&self, identity: &str) -> Option<u32> {
        self.records
            .get(&IdentityKey::new(identity))
            .map(|record| record.failed_attempts)
    }

    pub fn config(&self) -> &ChallengeConfig {
        &self.config
    }

    /// Snapshot of the live challenge for `key`, evicting it if expired or
    /// locked out. The entry guard is released before returning.
    fn pending_record(&self, key: &IdentityKey, now: Timestamp) -> Option<ChallengeRecord> {
        let entry = match self.records.entry(key.clone()) {
            Entry::Occupied(entry) => entry,
            Entry::Vacant(_) => {
                debug!(identity = %key, "No pending challenge");
                return None;
            }
        };

        if entry.get().is_expired(now) {
            entry.remove();
            debug!(identity = %key, "Challenge expired");
            return None;
        }

        if entry.get().failed_attempts >= self.config.max_failed_attempts {
            entry.remove();
            debug!(identity = %key, "Challenge locked out");
            return None;
        }

        Some(entry.get().clone())
    }

    fn signer_matches(&self, key: &IdentityKey, message: &str, signature: &str) -> bool {
        match self.verifier.recover_identity(message, signature) {
            Ok(recovered) => IdentityKey::new(&recovered) == *key,
            Err(e) => {
                debug!(identity = %key, error = %e, "Signature recovery failed");
                false
            }
        }
    }
}

impl ChallengeAuthApi for ChallengeRegistry {
    fn issue(&self, identity: &str) -> String {
        let now = self.clock.now();
        let value = challenge_text(&self.config.realm, identity, now, &generate_nonce());
        let key = IdentityKey::new(identity);

        debug!(identity = %key, "Issued challenge");
        self.records.insert(
            key,
            ChallengeRecord::new(value.clone(), now + self.config.ttl()),
        );
        value
    }

    fn verify(&self, identity: &str, challenge: &str, signature: &str) -> bool {
        let key = IdentityKey::new(identity);
        let now = self.clock.now();

        let Some(pending) = self.pending_record(&key, now) else {
            return false;
        };

        let verified =
            pending.matches(challenge) && self.signer_matches(&key, &pending.value, signature);

        let mut entry = match self.records.entry(key) {
            Entry::Occupied(entry) if entry.get().value == pending.value => entry,
            _ => {
                debug!(
                    identity = %IdentityKey::new(identity),
                    "Challenge replaced during verification"
                );
                return false;
            }
        };

        if entry.get().failed_attempts >= self.config.max_failed_attempts {
            let (key, _) = entry.remove_entry();
            debug!(identity = %key, "Challenge locked out");
            return false;
        }

        if verified {
            let (key, _) = entry.remove_entry();
            debug!(identity = %key, "Challenge verified");
            return true;
        }

        let record = entry.get_mut();
        record.failed_attempts += 1;
        debug!(
            identity = %IdentityKey::new(identity),
            attempts = record.failed_attempts,
            "Challenge verification failed"
        );
        false
    }
}
