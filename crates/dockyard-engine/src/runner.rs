//! Runner traits and the per-type dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing;

use dockyard_core::error::AppError;
use dockyard_entity::job::Job;

/// Business-logic failure from a runner.
///
/// Recorded verbatim on the job; this layer never retries, so there is no
/// transient/permanent distinction to make here. A caller that wants
/// retries builds them into its handler or submits a new job.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RunnerError(String);

impl RunnerError {
    /// Create a runner error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<AppError> for RunnerError {
    fn from(err: AppError) -> Self {
        Self(err.to_string())
    }
}

/// Executes the business logic for one job.
///
/// The worker pool holds exactly one `Runner`; a deployment normally
/// supplies a [`RunnerRegistry`] here so each job type gets its own
/// strategy, but a single monolithic implementation is equally valid.
///
/// Implementations must be safe to invoke concurrently from multiple
/// workers on different jobs, and must not block indefinitely: the pool
/// has no built-in timeout, so an unbounded call starves one worker slot
/// permanently. Handlers needing bounded execution wrap themselves in
/// `tokio::time::timeout`.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run the job. `Ok(Some(result))` stores the result string on the
    /// job; `Ok(None)` completes it without one.
    async fn run(&self, job: &Job) -> Result<Option<String>, RunnerError>;
}

/// Per-type job strategy, registered into a [`RunnerRegistry`].
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// The job type this handler processes.
    fn job_type(&self) -> &str;

    /// Execute one job of that type.
    async fn run(&self, job: &Job) -> Result<Option<String>, RunnerError>;
}

/// Dispatch table mapping job types to their handlers.
///
/// Built once at startup by the hosting process; the worker pool stays
/// ignorant of business semantics and only sees the [`Runner`] facade.
#[derive(Default)]
pub struct RunnerRegistry {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl RunnerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its job type. A later registration for the
    /// same type replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!(%job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Check if a handler is registered for a job type.
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }

    /// The list of registered job types.
    pub fn registered_types(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }
}

impl std::fmt::Debug for RunnerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

#[async_trait]
impl Runner for RunnerRegistry {
    async fn run(&self, job: &Job) -> Result<Option<String>, RunnerError> {
        let handler = self.handlers.get(&job.job_type).ok_or_else(|| {
            RunnerError::new(format!(
                "No runner registered for job type '{}'",
                job.job_type
            ))
        })?;

        handler.run(job).await
    }
}
