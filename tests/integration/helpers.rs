//! Shared test helpers for integration tests.
//!
//! Each test gets a fresh in-memory store, a live orchestration engine with
//! a couple of toy runners, and the real router, so requests exercise the
//! same path production traffic takes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;

use dockyard_api::state::AppState;
use dockyard_core::config::AppConfig;
use dockyard_core::config::janitor::JanitorConfig;
use dockyard_core::config::orchestrator::OrchestratorConfig;
use dockyard_engine::{JobHandler, Orchestrator, RunnerError, RunnerRegistry};
use dockyard_entity::job::Job;
use dockyard_store::{JobStore, MemoryJobStore};

/// Succeeds immediately with result `"ok"`.
struct NoopHandler;

#[async_trait]
impl JobHandler for NoopHandler {
    fn job_type(&self) -> &str {
        "noop"
    }

    async fn run(&self, _job: &Job) -> Result<Option<String>, RunnerError> {
        Ok(Some("ok".to_string()))
    }
}

/// Always fails with `"boom"`.
struct BoomHandler;

#[async_trait]
impl JobHandler for BoomHandler {
    fn job_type(&self) -> &str {
        "boom"
    }

    async fn run(&self, _job: &Job) -> Result<Option<String>, RunnerError> {
        Err(RunnerError::new("boom"))
    }
}

/// Test application context.
pub struct TestApp {
    /// The axum router for making test requests.
    pub router: Router,
    /// Shutdown sender for the background engine.
    cancel: watch::Sender<bool>,
}

impl TestApp {
    /// Build a full application over a fresh in-memory store and start its
    /// engine.
    pub async fn new() -> Self {
        let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());

        let mut registry = RunnerRegistry::new();
        registry.register(Arc::new(NoopHandler));
        registry.register(Arc::new(BoomHandler));

        let orchestrator = Orchestrator::new(
            Arc::clone(&store),
            Arc::new(registry),
            OrchestratorConfig {
                enabled: true,
                workers: 2,
                dispatch_interval_seconds: 1,
            },
            JanitorConfig {
                enabled: false,
                retention_seconds: 3600,
                sweep_interval_seconds: 600,
            },
        );
        let service = Arc::new(orchestrator.service());

        let (cancel, cancel_rx) = watch::channel(false);
        tokio::spawn(async move { orchestrator.run(cancel_rx).await });

        let state = AppState {
            config: Arc::new(AppConfig::load("test").expect("Failed to load test config")),
            jobs: service,
        };

        Self {
            router: dockyard_api::router::build_router(state),
            cancel,
        }
    }

    /// Issue one request and return the status plus parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };

        (status, json)
    }

    /// Poll one job until it reaches a terminal status, returning its final
    /// JSON representation.
    pub async fn wait_for_terminal(&self, id: &str) -> Value {
        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                let (status, body) = self.request("GET", &format!("/api/jobs/{id}"), None).await;
                assert_eq!(status, StatusCode::OK);
                let job = body["data"].clone();
                let job_status = job["status"].as_str().unwrap_or_default();
                if job_status == "completed" || job_status == "error" {
                    return job;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await
        .expect("job did not reach a terminal status in time")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}
