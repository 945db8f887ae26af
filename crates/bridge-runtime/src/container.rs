//! # Service Container
//!
//! Builds every adapter and service once and hands out shared handles.
//!
//! ## Selection
//!
//! - Ledger: JSON-RPC when `ledger.rpc_url` is set, otherwise in-memory.
//! - Cache: RocksDB when built with `rocksdb` and `storage.data_dir` is set,
//!   otherwise in-memory.

use crate::config::BridgeConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use vb_01_ledger_sync::{
    ElectionCacheStore, EthRpcLedger, InMemoryCacheStore, InMemoryLedger, LedgerClient,
    LedgerError, LedgerSyncService, StoreError,
};
use vb_02_wallet_auth::{
    ChallengeRegistry, EthereumSignatureVerifier, InMemoryWalletRegistry, WalletAuthService,
    WalletRegistry,
};

/// Wiring failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("failed to build ledger client: {0}")]
    Ledger(#[from] LedgerError),

    #[error("failed to open cache store: {0}")]
    Store(#[from] StoreError),
}

/// Every long-lived component of the bridge.
pub struct BridgeContainer {
    pub config: BridgeConfig,
    pub ledger: Arc<dyn LedgerClient>,
    pub store: Arc<dyn ElectionCacheStore>,
    pub sync: Arc<LedgerSyncService>,
    pub challenges: Arc<ChallengeRegistry>,
    pub wallets: Arc<dyn WalletRegistry>,
    pub auth: Arc<WalletAuthService>,
}

impl BridgeContainer {
    /// Wire the bridge from configuration.
    pub fn new(config: BridgeConfig) -> Result<Self, ContainerError> {
        let ledger = build_ledger(&config)?;
        let store = build_store(&config)?;
        Ok(Self::assemble(config, ledger, store))
    }

    /// Wire the bridge around an existing ledger and store.
    pub fn assemble(
        config: BridgeConfig,
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn ElectionCacheStore>,
    ) -> Self {
        let sync = Arc::new(LedgerSyncService::new(ledger.clone(), store.clone()));

        let challenges = Arc::new(ChallengeRegistry::new(
            Arc::new(EthereumSignatureVerifier::new()),
            config.challenge.clone(),
        ));
        let wallets: Arc<dyn WalletRegistry> = Arc::new(InMemoryWalletRegistry::new());
        let auth = Arc::new(WalletAuthService::new(challenges.clone(), wallets.clone()));

        Self {
            config,
            ledger,
            store,
            sync,
            challenges,
            wallets,
            auth,
        }
    }
}

fn build_ledger(config: &BridgeConfig) -> Result<Arc<dyn LedgerClient>, ContainerError> {
    match &config.ledger.rpc_url {
        Some(url) => {
            info!(rpc_url = %url, contract = %config.ledger.contract_address, "Using JSON-RPC ledger");
            Ok(Arc::new(EthRpcLedger::new(&config.ledger)?))
        }
        None => {
            warn!("No ledger RPC URL configured, using in-memory ledger");
            Ok(Arc::new(InMemoryLedger::new()))
        }
    }
}

#[cfg(feature = "rocksdb")]
fn build_store(config: &BridgeConfig) -> Result<Arc<dyn ElectionCacheStore>, ContainerError> {
    match &config.storage.data_dir {
        Some(dir) => {
            let path = dir.join("cache");
            info!(path = %path.display(), "Opening RocksDB cache store");
            Ok(Arc::new(vb_01_ledger_sync::RocksDbCacheStore::open(
                path,
                config.storage.sync_writes,
            )?))
        }
        None => Ok(Arc::new(InMemoryCacheStore::new())),
    }
}

#[cfg(not(feature = "rocksdb"))]
fn build_store(config: &BridgeConfig) -> Result<Arc<dyn ElectionCacheStore>, ContainerError> {
    if let Some(dir) = &config.storage.data_dir {
        warn!(
            data_dir = %dir.display(),
            "Built without the rocksdb feature, ignoring data_dir and caching in memory"
        );
    }
    Ok(Arc::new(InMemoryCacheStore::new()))
}
