//! Job submission and inspection handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use dockyard_core::error::AppError;
use dockyard_entity::job::{JobId, SubmitJob};

use crate::dto::request::SubmitJobRequest;
use crate::dto::response::{ApiResponse, JobResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/jobs
///
/// Accepts the job and returns immediately; execution happens in the
/// background. Poll `GET /api/jobs/{id}` for the outcome.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(body): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobResponse>>), ApiError> {
    if body.job_type.trim().is_empty() {
        return Err(AppError::validation("job_type must not be empty").into());
    }

    let job = state
        .jobs
        .submit(SubmitJob::new(body.job_type, body.request))
        .await?;

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(job.into()))))
}

/// GET /api/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<JobResponse>>>, ApiError> {
    let jobs = state.jobs.list().await?;
    let jobs = jobs.into_iter().map(JobResponse::from).collect();
    Ok(Json(ApiResponse::ok(jobs)))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<JobResponse>>, ApiError> {
    let job = state.jobs.get(&JobId::from(id)).await?;
    Ok(Json(ApiResponse::ok(job.into())))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.jobs.delete(&JobId::from(id)).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Job deleted".to_string(),
    })))
}
