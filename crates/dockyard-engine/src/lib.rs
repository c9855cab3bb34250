//! Job orchestration engine for Dockyard.
//!
//! This crate provides:
//! - A shared FIFO queue of job identifiers
//! - A dispatcher that periodically scans the store for pending jobs
//! - A worker pool that acquires and executes jobs
//! - A janitor that reclaims jobs past the retention window
//! - The runner traits and per-type dispatch table
//! - A submission/query facade consumed by the HTTP layer
//!
//! Coordination between processes goes through the store's atomic
//! acquisition; nothing in here shares locks across components.

pub mod dispatcher;
pub mod janitor;
pub mod orchestrator;
pub mod pool;
pub mod queue;
pub mod runner;
pub mod service;

pub use dispatcher::Dispatcher;
pub use janitor::Janitor;
pub use orchestrator::Orchestrator;
pub use pool::WorkerPool;
pub use queue::JobQueue;
pub use runner::{JobHandler, Runner, RunnerError, RunnerRegistry};
pub use service::JobService;
