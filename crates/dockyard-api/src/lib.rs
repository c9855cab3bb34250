//! HTTP API for Dockyard.
//!
//! A thin axum layer over [`dockyard_engine::JobService`]: submission turns
//! a request into a pending job and returns immediately; execution happens
//! in the background engine.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
