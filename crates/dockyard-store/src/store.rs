//! The job store contract.

use std::collections::BTreeMap;

use async_trait::async_trait;

use dockyard_core::result::AppResult;
use dockyard_entity::job::{Job, JobId, JobStatus, SubmitJob};

/// Durable collection of jobs with atomic acquisition.
///
/// Every method must be safe under concurrent callers: the dispatcher, all
/// workers, the janitor, and API submitters all hold the same store, and
/// other process instances may share the same backing storage.
///
/// Ownership of a job is established only through [`acquire_job`]; a plain
/// [`set_job_status`] write must never be used to claim work.
///
/// [`acquire_job`]: JobStore::acquire_job
/// [`set_job_status`]: JobStore::set_job_status
#[async_trait]
pub trait JobStore: Send + Sync + std::fmt::Debug {
    /// Persist a new job with status [`JobStatus::Pending`], assigning its
    /// id and timestamps. Returns the stored record.
    async fn insert(&self, submit: SubmitJob) -> AppResult<Job>;

    /// Remove a job. Removing an id that does not exist is a no-op, not an
    /// error, so sweeps racing with explicit deletion stay quiet.
    async fn delete(&self, id: &JobId) -> AppResult<()>;

    /// Snapshot of all jobs. No ordering is guaranteed.
    async fn select_all(&self) -> AppResult<Vec<Job>>;

    /// Fetch one job, or a not-found error.
    async fn select_by_id(&self, id: &JobId) -> AppResult<Job>;

    /// Atomically transition the job from `Pending` to `InProgress`.
    ///
    /// Returns `true` only if this caller performed the transition. If
    /// another caller already moved the job out of `Pending`, returns
    /// `false` with no error — losing this race is a normal outcome of the
    /// polling design. Implementations must use a single conditional write
    /// (compare-and-swap on the status), never a separate read followed by
    /// a write.
    async fn acquire_job(&self, id: &JobId) -> AppResult<bool>;

    /// Set the job status. Used by workers after a successful acquisition.
    async fn set_job_status(&self, id: &JobId, status: JobStatus) -> AppResult<()>;

    /// Record the result payload of a successfully completed run.
    async fn set_job_result(&self, id: &JobId, result: &str) -> AppResult<()>;

    /// Record a runner failure: stores the message and moves the status to
    /// [`JobStatus::Error`] in the same write.
    async fn set_job_error(&self, id: &JobId, message: &str) -> AppResult<()>;

    /// Record one auxiliary metadata entry on the job.
    async fn set_meta(&self, id: &JobId, key: &str, value: &str) -> AppResult<()>;

    /// Read the job's metadata map.
    async fn get_meta(&self, id: &JobId) -> AppResult<BTreeMap<String, String>>;
}
