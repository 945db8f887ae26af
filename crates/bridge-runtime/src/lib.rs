//! # Vote-Bridge Runtime
//!
//! Wires the ledger-sync (VB-01) and wallet-auth (VB-02) subsystems into one
//! process and exposes them over HTTP.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, `VB_CONFIG`, `VB_*` env)
//! 2. Build the container (ledger, cache, services)
//! 3. Bind the HTTP listener
//! 4. Start the sync scheduler (first pass immediately) and challenge sweeper
//!
//! ## Shutdown Sequence
//!
//! 1. Flip the shared `watch` flag
//! 2. Wait for the scheduler; an in-flight pass runs to completion
//! 3. Wait for the sweeper and the HTTP server to drain

pub mod config;
pub mod container;
pub mod http;

pub use config::{BridgeConfig, ConfigError};
pub use container::{BridgeContainer, ContainerError};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};
use vb_01_ledger_sync::{SyncScheduler, SyncSchedulerHandle};
use vb_02_wallet_auth::{ChallengeSweeper, ChallengeSweeperHandle};

use crate::http::{build_router, AppState};

/// A running bridge: HTTP server plus background tasks.
pub struct BridgeRuntime {
    container: Arc<BridgeContainer>,
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    server: JoinHandle<std::io::Result<()>>,
    scheduler: Option<SyncSchedulerHandle>,
    sweeper: ChallengeSweeperHandle,
}

impl BridgeRuntime {
    /// Bind the listener and spawn every task.
    pub async fn start(container: Arc<BridgeContainer>) -> Result<Self> {
        let config = &container.config;
        info!("===========================================");
        info!("  Vote-Bridge Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let listener = tokio::net::TcpListener::bind(config.http_addr())
            .await
            .with_context(|| format!("Failed to bind {}", config.http_addr()))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read listener address")?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let router = build_router(
            AppState {
                sync: container.sync.clone(),
                auth: container.auth.clone(),
            },
            &config.cors,
        );
        let mut server_shutdown = shutdown_rx.clone();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.changed().await;
                })
                .await
        });
        info!(addr = %local_addr, "HTTP server listening");

        let scheduler = if config.sync.enabled {
            Some(SyncScheduler::start(container.sync.clone(), &config.sync))
        } else {
            info!("Background synchronization disabled");
            None
        };

        let sweeper = ChallengeSweeper::start(
            container.challenges.clone(),
            config.challenge.sweep_interval(),
        );

        Ok(Self {
            container,
            local_addr,
            shutdown_tx,
            server,
            scheduler,
            sweeper,
        })
    }

    /// Address the HTTP server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn container(&self) -> Arc<BridgeContainer> {
        Arc::clone(&self.container)
    }

    /// Stop every task and wait for them to exit.
    pub async fn shutdown(self) -> Result<()> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        if let Some(scheduler) = self.scheduler {
            scheduler.stop().await;
        }
        self.sweeper.stop().await;

        self.server
            .await
            .context("HTTP server task panicked")?
            .context("HTTP server failed")?;

        info!("Shutdown complete");
        Ok(())
    }
}
