//! Janitor — reclaims jobs older than the retention window.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing;

use dockyard_core::config::janitor::JanitorConfig;
use dockyard_store::JobStore;

/// Periodic age-based reaper.
///
/// Deletes every job whose age exceeds the retention window, regardless of
/// status — a pending or in-progress job past the window is reclaimed just
/// like a finished one. Runs on its own schedule, independent of the
/// dispatcher/worker cycle.
#[derive(Debug)]
pub struct Janitor {
    store: Arc<dyn JobStore>,
    retention: chrono::Duration,
    interval: Duration,
}

impl Janitor {
    /// Create a janitor over the shared store.
    pub fn new(store: Arc<dyn JobStore>, config: &JanitorConfig) -> Self {
        Self {
            store,
            retention: chrono::Duration::seconds(config.retention_seconds as i64),
            interval: Duration::from_secs(config.sweep_interval_seconds),
        }
    }

    /// Run until the cancel signal flips to `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            retention_seconds = self.retention.num_seconds(),
            sweep_interval_seconds = self.interval.as_secs(),
            "Janitor started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!("Janitor received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }

        tracing::info!("Janitor stopped");
    }

    /// One sweep over the store. The first store error aborts the sweep;
    /// whatever was missed is picked up on the next tick.
    pub async fn sweep(&self) {
        let jobs = match self.store.select_all().await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "Janitor failed to list jobs");
                return;
            }
        };

        let now = Utc::now();
        let mut deleted = 0usize;

        for job in jobs {
            if job.age(now) <= self.retention {
                continue;
            }

            tracing::info!(job_id = %job.id, status = %job.status, "Deleting expired job");
            if let Err(e) = self.store.delete(&job.id).await {
                tracing::error!(job_id = %job.id, error = %e, "Janitor sweep aborted");
                return;
            }
            deleted += 1;
        }

        if deleted > 0 {
            tracing::info!(deleted, "Janitor sweep complete");
        }
    }
}
