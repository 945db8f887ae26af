//! # Sync Scheduler
//!
//! Fixed-interval background trigger for `synchronize_all`. The first pass
//! runs immediately at start.
//!
//! Stopping flips a `watch` flag. The flag is only observed between passes,
//! so a pass already in flight runs to completion before the task exits.

use crate::config::SyncConfig;
use crate::ports::inbound::LedgerSyncApi;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Background reconciliation task.
pub struct SyncScheduler;

impl SyncScheduler {
    /// Spawn the task on the current tokio runtime.
    pub fn start(api: Arc<dyn LedgerSyncApi>, config: &SyncConfig) -> SyncSchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let interval = config.interval();
        info!(interval_secs = config.interval_secs, "Starting sync scheduler");
        let task = tokio::spawn(run(api, interval, shutdown_rx));
        SyncSchedulerHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run(
    api: Arc<dyn LedgerSyncApi>,
    interval: std::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Not raced against shutdown: a started pass always finishes.
                match api.synchronize_all().await {
                    Ok(report) => debug!(
                        synced = report.synced_count,
                        errors = report.error_count(),
                        "Scheduled sync pass complete"
                    ),
                    Err(e) => error!(error = %e, "Scheduled sync pass failed"),
                }
            }
            _ = shutdown.changed() => {
                break;
            }
        }
        if *shutdown.borrow() {
            break;
        }
    }
    info!("Sync scheduler stopped");
}

/// Handle to a running scheduler.
pub struct SyncSchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SyncSchedulerHandle {
    /// Signal the task and wait for it to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Sync scheduler task panicked");
            }
        }
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}
