//! Orchestrator — wires the dispatcher, worker pool, and janitor together.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;

use dockyard_core::config::janitor::JanitorConfig;
use dockyard_core::config::orchestrator::OrchestratorConfig;
use dockyard_store::JobStore;

use crate::dispatcher::Dispatcher;
use crate::janitor::Janitor;
use crate::pool::WorkerPool;
use crate::queue::JobQueue;
use crate::runner::Runner;
use crate::service::JobService;

/// Owns the moving parts of the engine and runs them under one shutdown
/// signal.
///
/// The hosting process builds one `Orchestrator` at startup, keeps the
/// [`JobService`] handle for its API layer, and runs the rest in a
/// background task until shutdown.
pub struct Orchestrator {
    store: Arc<dyn JobStore>,
    queue: Arc<JobQueue>,
    runner: Arc<dyn Runner>,
    orchestrator_config: OrchestratorConfig,
    janitor_config: JanitorConfig,
}

impl Orchestrator {
    /// Assemble the engine. Nothing runs until [`run`](Self::run).
    pub fn new(
        store: Arc<dyn JobStore>,
        runner: Arc<dyn Runner>,
        orchestrator_config: OrchestratorConfig,
        janitor_config: JanitorConfig,
    ) -> Self {
        Self {
            store,
            queue: Arc::new(JobQueue::new()),
            runner,
            orchestrator_config,
            janitor_config,
        }
    }

    /// Submission/query facade over the same store this engine executes
    /// from.
    pub fn service(&self) -> JobService {
        JobService::new(Arc::clone(&self.store))
    }

    /// Run dispatcher, workers, and janitor until the cancel signal flips
    /// to `true`, then wait for all of them to wind down (in-flight runner
    /// calls are allowed to finish).
    pub async fn run(&self, cancel: watch::Receiver<bool>) {
        let mut handles = Vec::new();

        if self.orchestrator_config.enabled {
            let dispatcher = Dispatcher::new(
                Arc::clone(&self.store),
                Arc::clone(&self.queue),
                &self.orchestrator_config,
            );
            let dispatcher_cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                dispatcher.run(dispatcher_cancel).await;
            }));

            let pool = WorkerPool::new(
                Arc::clone(&self.store),
                Arc::clone(&self.queue),
                Arc::clone(&self.runner),
                &self.orchestrator_config,
            );
            let pool_cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                pool.run(pool_cancel).await;
            }));
        } else {
            tracing::info!("Dispatcher and worker pool disabled");
        }

        if self.janitor_config.enabled {
            let janitor = Janitor::new(Arc::clone(&self.store), &self.janitor_config);
            let janitor_cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                janitor.run(janitor_cancel).await;
            }));
        } else {
            tracing::info!("Janitor disabled");
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Engine task panicked");
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("workers", &self.orchestrator_config.workers)
            .field(
                "dispatch_interval_seconds",
                &self.orchestrator_config.dispatch_interval_seconds,
            )
            .finish()
    }
}
