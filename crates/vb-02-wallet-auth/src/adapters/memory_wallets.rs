//! # In-Memory Wallet Registry

use crate::domain::entities::{IdentityKey, RegisteredWallet};
use crate::domain::errors::AuthError;
use crate::ports::outbound::WalletRegistry;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{SharedTimeSource, SystemTimeSource};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Wallet registry held in process memory.
pub struct InMemoryWalletRegistry {
    wallets: RwLock<BTreeMap<IdentityKey, RegisteredWallet>>,
    clock: SharedTimeSource,
}

impl Default for InMemoryWalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWalletRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemTimeSource))
    }

    pub fn with_clock(clock: SharedTimeSource) -> Self {
        Self {
            wallets: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.wallets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.read().is_empty()
    }
}

#[async_trait]
impl WalletRegistry for InMemoryWalletRegistry {
    async fn register(&self, wallet: &IdentityKey) -> Result<bool, AuthError> {
        let mut wallets = self.wallets.write();
        if wallets.contains_key(wallet) {
            return Ok(false);
        }
        wallets.insert(
            wallet.clone(),
            RegisteredWallet {
                wallet_address: wallet.clone(),
                registered_at: self.clock.now(),
            },
        );
        Ok(true)
    }

    async fn is_registered(&self, wallet: &IdentityKey) -> Result<bool, AuthError> {
        Ok(self.wallets.read().contains_key(wallet))
    }

    async fn list(&self) -> Result<Vec<RegisteredWallet>, AuthError> {
        Ok(self.wallets.read().values().cloned().collect())
    }

    async fn unregister(&self, wallet: &IdentityKey) -> Result<bool, AuthError> {
        Ok(self.wallets.write().remove(wallet).is_some())
    }
}
