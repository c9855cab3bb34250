//! Dispatcher — periodically surfaces pending jobs to the worker pool.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing;

use dockyard_core::config::orchestrator::OrchestratorConfig;
use dockyard_entity::job::JobStatus;
use dockyard_store::JobStore;

use crate::queue::JobQueue;

/// Scans the store on a fixed interval and enqueues every pending job id.
///
/// The same id is re-enqueued on every tick until some worker wins the
/// acquisition, which is what makes a crashed or busy pool self-healing:
/// the dispatcher holds no state of its own, so nothing is lost between
/// ticks. Ownership is decided by the store, not by queue membership.
#[derive(Debug)]
pub struct Dispatcher {
    store: Arc<dyn JobStore>,
    queue: Arc<JobQueue>,
    interval: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over the shared store and queue.
    pub fn new(store: Arc<dyn JobStore>, queue: Arc<JobQueue>, config: &OrchestratorConfig) -> Self {
        Self {
            store,
            queue,
            interval: Duration::from_secs(config.dispatch_interval_seconds),
        }
    }

    /// Run until the cancel signal flips to `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(interval_seconds = self.interval.as_secs(), "Dispatcher started");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!("Dispatcher received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.scan().await;
                }
            }
        }

        tracing::info!("Dispatcher stopped");
    }

    /// One tick: enqueue every pending job id. A store failure abandons
    /// this scan; the next tick retries from scratch.
    pub async fn scan(&self) {
        let jobs = match self.store.select_all().await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "Dispatcher failed to scan job store");
                return;
            }
        };

        let mut enqueued = 0usize;
        for job in jobs {
            if job.status == JobStatus::Pending {
                tracing::trace!(job_id = %job.id, job_type = %job.job_type, "Enqueueing pending job");
                self.queue.push(job.id).await;
                enqueued += 1;
            }
        }

        if enqueued > 0 {
            tracing::debug!(enqueued, "Dispatcher tick complete");
        }
    }
}
