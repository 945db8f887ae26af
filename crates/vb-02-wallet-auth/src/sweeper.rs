//! Fixed-interval eviction of expired challenges.

use crate::registry::ChallengeRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Background sweeper for a `ChallengeRegistry`.
pub struct ChallengeSweeper;

impl ChallengeSweeper {
    /// Spawn the sweeper on the current tokio runtime.
    pub fn start(registry: Arc<ChallengeRegistry>, interval: Duration) -> ChallengeSweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = registry.remove_expired();
                        if removed > 0 {
                            debug!(removed, "Evicted expired challenges");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            info!("Challenge sweeper stopped");
        });

        ChallengeSweeperHandle { shutdown_tx, task }
    }
}

/// Handle to a running sweeper.
pub struct ChallengeSweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ChallengeSweeperHandle {
    /// Signal the sweeper and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "Challenge sweeper task panicked");
        }
    }
}
