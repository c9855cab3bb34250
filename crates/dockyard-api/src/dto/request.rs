//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    /// Runner selector, e.g. `"create_environment"`.
    pub job_type: String,
    /// Opaque serialized payload for the runner. Defaults to empty.
    #[serde(default)]
    pub request: String,
}
