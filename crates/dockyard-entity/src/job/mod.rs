//! The Job entity: one durable unit of asynchronous work.

pub mod id;
pub mod model;
pub mod status;

pub use id::JobId;
pub use model::{Job, SubmitJob};
pub use status::JobStatus;
