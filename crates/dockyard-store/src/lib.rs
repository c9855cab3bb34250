//! Durable job storage for Dockyard.
//!
//! This crate defines the [`JobStore`] contract that the orchestration
//! engine coordinates through, plus two backends: a PostgreSQL store for
//! production and a mutex-serialized in-memory store for development and
//! tests. Both honor the same atomicity contract — in particular,
//! acquisition is a single conditional write, never read-then-write.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use memory::MemoryJobStore;
pub use postgres::PostgresJobStore;
pub use store::JobStore;
