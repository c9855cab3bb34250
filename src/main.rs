//! Dockyard Server — control plane for container-environment orchestration.
//!
//! Main entry point that wires the store, engine, and HTTP API together.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use dockyard_core::config::AppConfig;
use dockyard_core::error::AppError;
use dockyard_engine::{Orchestrator, RunnerRegistry};
use dockyard_store::{JobStore, MemoryJobStore, PostgresJobStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("DOCKYARD_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Dockyard v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Job store ────────────────────────────────────────
    let store = build_store(&config).await?;

    // ── Step 2: Runners ──────────────────────────────────────────
    // Deployment-specific runners are registered here; the orchestration
    // core never interprets job types itself. A job whose type has no
    // handler fails with a descriptive error.
    let registry = RunnerRegistry::new();
    if registry.registered_types().is_empty() {
        tracing::warn!("No job runners registered; submitted jobs will fail until the deployment registers handlers");
    }

    // ── Step 3: Engine ───────────────────────────────────────────
    let orchestrator = Orchestrator::new(
        Arc::clone(&store),
        Arc::new(registry),
        config.orchestrator.clone(),
        config.janitor.clone(),
    );
    let service = Arc::new(orchestrator.service());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let engine_cancel = shutdown_rx.clone();
    let engine_handle = tokio::spawn(async move {
        orchestrator.run(engine_cancel).await;
    });

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app_state = dockyard_api::state::AppState {
        config: Arc::new(config.clone()),
        jobs: service,
    };
    let app = dockyard_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Dockyard listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Wait for background tasks ────────────────────────
    tracing::info!("Waiting for background tasks to complete...");
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let _ = tokio::time::timeout(grace, engine_handle).await;

    tracing::info!("Dockyard shut down gracefully");
    Ok(())
}

/// Construct the configured job store backend.
async fn build_store(config: &AppConfig) -> Result<Arc<dyn JobStore>, AppError> {
    match config.store.backend.as_str() {
        "postgres" => {
            let pool = dockyard_store::connection::connect(&config.database).await?;
            dockyard_store::migration::run_migrations(&pool).await?;
            Ok(Arc::new(PostgresJobStore::new(pool)))
        }
        "memory" => {
            tracing::warn!("Using the in-memory job store; jobs will not survive a restart");
            Ok(Arc::new(MemoryJobStore::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown store backend '{other}' (expected 'postgres' or 'memory')"
        ))),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
