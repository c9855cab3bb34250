//! Application state shared across all handlers.

use std::sync::Arc;

use dockyard_core::config::AppConfig;
use dockyard_engine::JobService;

/// Application state containing the shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Job submission/query facade.
    pub jobs: Arc<JobService>,
}
