//! PostgreSQL job store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use dockyard_core::error::{AppError, ErrorKind};
use dockyard_core::result::AppResult;
use dockyard_entity::job::{Job, JobId, JobStatus, SubmitJob};

use crate::store::JobStore;

/// Production [`JobStore`] backed by PostgreSQL.
///
/// Acquisition relies on a conditional `UPDATE ... WHERE status = 'pending'`:
/// the row count tells this process whether it won the race, so the
/// guarantee holds across every worker in every process sharing the
/// database.
#[derive(Debug, Clone)]
pub struct PostgresJobStore {
    pool: PgPool,
}

impl PostgresJobStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: &JobId) -> AppError {
        AppError::not_found(format!("Job '{id}' does not exist"))
    }

    /// Distinguish "row missing" from "condition not met" after a
    /// zero-row conditional update.
    async fn exists(&self, id: &JobId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check job", e))
    }
}

#[async_trait]
impl JobStore for PostgresJobStore {
    async fn insert(&self, submit: SubmitJob) -> AppResult<Job> {
        let id = JobId::generate();
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, job_type, status, request, metadata) \
             VALUES ($1, $2, 'pending', $3, '{}'::jsonb) RETURNING *",
        )
        .bind(&id)
        .bind(&submit.job_type)
        .bind(&submit.request)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert job", e))
    }

    async fn delete(&self, id: &JobId) -> AppResult<()> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete job", e))?;
        Ok(())
    }

    async fn select_all(&self) -> AppResult<Vec<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list jobs", e))
    }

    async fn select_by_id(&self, id: &JobId) -> AppResult<Job> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn acquire_job(&self, id: &JobId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE jobs SET status = 'in_progress', updated_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire job", e))?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        // Zero rows: either the job is gone or someone else owns it.
        if self.exists(id).await? {
            Ok(false)
        } else {
            Err(Self::not_found(id))
        }
    }

    async fn set_job_status(&self, id: &JobId, status: JobStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set job status", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn set_job_result(&self, id: &JobId, result: &str) -> AppResult<()> {
        let outcome = sqlx::query("UPDATE jobs SET result = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(result)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set job result", e)
            })?;

        if outcome.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn set_job_error(&self, id: &JobId, message: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE jobs SET status = 'error', error_message = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set job error", e))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn set_meta(&self, id: &JobId, key: &str, value: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE jobs SET metadata = metadata || jsonb_build_object($2::text, $3::text), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set job metadata", e))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn get_meta(&self, id: &JobId) -> AppResult<BTreeMap<String, String>> {
        sqlx::query_scalar::<_, Json<BTreeMap<String, String>>>(
            "SELECT metadata FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read job metadata", e))?
        .map(|json| json.0)
        .ok_or_else(|| Self::not_found(id))
    }
}
