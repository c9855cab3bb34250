//! Submission and query facade over the job store.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing;

use dockyard_core::result::AppResult;
use dockyard_entity::job::{Job, JobId, SubmitJob};
use dockyard_store::JobStore;

/// What HTTP controllers (and anything else outside the engine) talk to.
///
/// Submission is just an insert: the job becomes visible to the dispatcher
/// on its next tick. The service never mutates status — that is the worker
/// pool's monopoly after acquisition.
#[derive(Debug, Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    /// Create a service over the shared store.
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Submit a new job for asynchronous execution. Returns the stored
    /// record, whose id callers poll for status.
    pub async fn submit(&self, submit: SubmitJob) -> AppResult<Job> {
        let job = self.store.insert(submit).await?;
        tracing::info!(job_id = %job.id, job_type = %job.job_type, "Job submitted");
        Ok(job)
    }

    /// Fetch one job.
    pub async fn get(&self, id: &JobId) -> AppResult<Job> {
        self.store.select_by_id(id).await
    }

    /// Snapshot of all jobs.
    pub async fn list(&self) -> AppResult<Vec<Job>> {
        self.store.select_all().await
    }

    /// Delete a job. Deleting an unknown id is a no-op.
    pub async fn delete(&self, id: &JobId) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!(job_id = %id, "Job deleted");
        Ok(())
    }

    /// Record one auxiliary metadata entry on a job.
    pub async fn set_meta(&self, id: &JobId, key: &str, value: &str) -> AppResult<()> {
        self.store.set_meta(id, key, value).await
    }

    /// Read a job's metadata map.
    pub async fn get_meta(&self, id: &JobId) -> AppResult<BTreeMap<String, String>> {
        self.store.get_meta(id).await
    }
}
