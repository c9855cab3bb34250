//! Core types shared by every Dockyard crate.
//!
//! This crate holds the unified error type, the `AppResult` alias, and the
//! configuration schemas. It deliberately has no dependency on the rest of
//! the workspace so that every other crate can depend on it.

pub mod config;
pub mod error;
pub mod result;
