//! Domain entities for Dockyard.

pub mod job;
