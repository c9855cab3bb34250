//! Job entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::JobId;
use super::status::JobStatus;

/// One durable unit of asynchronous work.
///
/// The control plane records every mutating command as a `Job` and executes
/// it in the background. The `request`, `result`, and `error_message`
/// payloads are opaque strings: the orchestration core never interprets
/// them, so any serialization the surrounding layers agree on is fine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique identifier, assigned by the store.
    pub id: JobId,
    /// Runner selector (e.g. `"create_environment"`). Opaque to the core.
    pub job_type: String,
    /// Current status.
    pub status: JobStatus,
    /// Serialized request payload describing the work.
    pub request: String,
    /// Result payload, set only when the job completed successfully.
    pub result: Option<String>,
    /// Failure message, set only when the runner failed.
    pub error_message: Option<String>,
    /// Auxiliary key/value facts recorded by the submitter or the runner
    /// (e.g. ids of child entities produced by the job). Never interpreted
    /// by the core.
    #[sqlx(json)]
    pub metadata: BTreeMap<String, String>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Age of the job relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }
}

/// Data required to submit a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJob {
    /// Runner selector.
    pub job_type: String,
    /// Serialized request payload.
    pub request: String,
}

impl SubmitJob {
    /// Convenience constructor.
    pub fn new(job_type: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            job_type: job_type.into(),
            request: request.into(),
        }
    }
}
