//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The orchestration components never read configuration
//! globally; they receive their sections explicitly at construction time.

pub mod app;
pub mod janitor;
pub mod logging;
pub mod orchestrator;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::janitor::JanitorConfig;
use self::logging::LoggingConfig;
use self::orchestrator::OrchestratorConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Job store backend selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Database connection settings (used by the `postgres` backend).
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Dispatcher and worker pool settings.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Job retention sweep settings.
    #[serde(default)]
    pub janitor: JanitorConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Job store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend name: `"postgres"` or `"memory"`.
    ///
    /// The in-memory backend keeps jobs only for the lifetime of the
    /// process and is intended for development and tests.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DOCKYARD__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCKYARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

fn default_backend() -> String {
    "postgres".to_string()
}

fn default_url() -> String {
    "postgres://localhost:5432/dockyard".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = config::Config::builder().build().unwrap();
        let app: AppConfig = config.try_deserialize().unwrap();

        assert_eq!(app.store.backend, "postgres");
        assert_eq!(app.orchestrator.workers, 10);
        assert_eq!(app.orchestrator.dispatch_interval_seconds, 5);
        assert_eq!(app.janitor.retention_seconds, 3600);
        assert_eq!(app.janitor.sweep_interval_seconds, 600);
        assert_eq!(app.server.port, 8080);
        assert_eq!(app.logging.level, "info");
    }
}
