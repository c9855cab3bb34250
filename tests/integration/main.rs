//! HTTP integration tests for the Dockyard API.

mod helpers;
mod jobs_test;
