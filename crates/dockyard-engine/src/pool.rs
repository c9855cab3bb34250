//! Worker pool — fixed set of concurrent job executors.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;

use dockyard_core::config::orchestrator::OrchestratorConfig;
use dockyard_entity::job::{JobId, JobStatus};
use dockyard_store::JobStore;

use crate::queue::JobQueue;
use crate::runner::Runner;

/// Fixed pool of workers pulling job ids off the shared queue.
///
/// Each worker independently: waits for an id, tries to acquire the job
/// through the store, and — only if it won — runs the runner and records
/// the outcome. Every failure along the way is absorbed into that one
/// job's state (or just logged); nothing a single job does can stop a
/// worker or the process.
pub struct WorkerPool {
    store: Arc<dyn JobStore>,
    queue: Arc<JobQueue>,
    runner: Arc<dyn Runner>,
    workers: usize,
}

impl WorkerPool {
    /// Create a pool; no tasks are spawned until [`run`](Self::run).
    pub fn new(
        store: Arc<dyn JobStore>,
        queue: Arc<JobQueue>,
        runner: Arc<dyn Runner>,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            queue,
            runner,
            workers: config.workers,
        }
    }

    /// Spawn all workers and wait for them to finish.
    ///
    /// Workers stop taking new items once the cancel signal flips; an
    /// in-flight runner call is allowed to complete, so this returns only
    /// after the last one has drained.
    pub async fn run(&self, cancel: watch::Receiver<bool>) {
        tracing::info!(workers = self.workers, "Worker pool started");

        let mut handles = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let worker = Worker {
                id,
                store: Arc::clone(&self.store),
                queue: Arc::clone(&self.queue),
                runner: Arc::clone(&self.runner),
            };
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move { worker.run(cancel).await }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Worker task panicked");
            }
        }

        tracing::info!("Worker pool stopped");
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

/// One executor loop within the pool.
struct Worker {
    id: usize,
    store: Arc<dyn JobStore>,
    queue: Arc<JobQueue>,
    runner: Arc<dyn Runner>,
}

impl Worker {
    async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::debug!(worker = self.id, "Worker started");

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::debug!(worker = self.id, "Worker received shutdown signal");
                        break;
                    }
                }
                job_id = self.queue.pop() => {
                    self.process(job_id).await;
                }
            }
        }
    }

    /// Handle one dequeued id: acquire, execute, record the outcome.
    async fn process(&self, job_id: JobId) {
        let acquired = match self.store.acquire_job(&job_id).await {
            Ok(acquired) => acquired,
            Err(e) if e.is_not_found() => {
                // Deleted between dispatch and acquisition (janitor or an
                // API caller); nothing to do.
                tracing::debug!(worker = self.id, %job_id, "Job vanished before acquisition");
                return;
            }
            Err(e) => {
                tracing::error!(worker = self.id, %job_id, error = %e, "Failed to acquire job");
                return;
            }
        };

        if !acquired {
            tracing::debug!(worker = self.id, %job_id, "Job already acquired by another worker");
            return;
        }

        let job = match self.store.select_by_id(&job_id).await {
            Ok(job) => job,
            Err(e) => {
                tracing::error!(worker = self.id, %job_id, error = %e, "Failed to load acquired job");
                return;
            }
        };

        tracing::info!(worker = self.id, %job_id, job_type = %job.job_type, "Starting job");

        match self.runner.run(&job).await {
            Ok(result) => {
                if let Some(result) = result {
                    if let Err(e) = self.store.set_job_result(&job_id, &result).await {
                        tracing::error!(worker = self.id, %job_id, error = %e, "Failed to set job result");
                        if let Err(e) = self.store.set_job_error(&job_id, &e.to_string()).await {
                            tracing::error!(worker = self.id, %job_id, error = %e, "Failed to set job error");
                        }
                        return;
                    }
                }

                if let Err(e) = self.store.set_job_status(&job_id, JobStatus::Completed).await {
                    tracing::error!(worker = self.id, %job_id, error = %e, "Failed to set job status");
                    return;
                }

                tracing::info!(worker = self.id, %job_id, "Finished job");
            }
            Err(e) => {
                tracing::error!(worker = self.id, %job_id, error = %e, "Job failed");
                if let Err(e) = self.store.set_job_error(&job_id, &e.to_string()).await {
                    tracing::error!(worker = self.id, %job_id, error = %e, "Failed to set job error");
                }
            }
        }
    }
}
