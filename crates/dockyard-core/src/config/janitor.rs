//! Job retention sweep configuration.

use serde::{Deserialize, Serialize};

/// Janitor configuration: how long finished jobs are kept, and how often
/// the expiry sweep runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Whether the janitor is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Age in seconds after which a job is deleted, regardless of status.
    #[serde(default = "default_retention")]
    pub retention_seconds: u64,
    /// Interval in seconds between sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_seconds: default_retention(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_retention() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    600
}
