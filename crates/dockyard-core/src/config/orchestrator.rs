//! Dispatcher and worker pool configuration.

use serde::{Deserialize, Serialize};

/// Job orchestration configuration: dispatcher cadence and pool size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Whether the dispatcher and worker pool are started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Interval in seconds between dispatcher scans for pending jobs.
    #[serde(default = "default_dispatch_interval")]
    pub dispatch_interval_seconds: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            workers: default_workers(),
            dispatch_interval_seconds: default_dispatch_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    10
}

fn default_dispatch_interval() -> u64 {
    5
}
