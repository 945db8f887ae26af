//! # Vote-Bridge
//!
//! Entry point: logging, configuration, wiring, then run until Ctrl+C.

use std::sync::Arc;

use anyhow::{Context, Result};
use bridge_runtime::{BridgeConfig, BridgeContainer, BridgeRuntime};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = BridgeConfig::load().context("Failed to load configuration")?;
    let container = BridgeContainer::new(config).context("Failed to build services")?;

    let runtime = BridgeRuntime::start(Arc::new(container)).await?;

    info!("Vote-Bridge is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await
}
