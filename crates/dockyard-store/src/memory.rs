//! In-memory reference job store.
//!
//! All state lives behind a single `tokio::sync::Mutex`, which serializes
//! every operation; in particular the check-and-set inside
//! [`MemoryJobStore::acquire_job`] happens entirely under the lock, giving
//! the same at-most-one-owner guarantee as the conditional update in the
//! PostgreSQL backend. Intended for development and tests; jobs do not
//! survive a restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use dockyard_core::error::AppError;
use dockyard_core::result::AppResult;
use dockyard_entity::job::{Job, JobId, JobStatus, SubmitJob};

use crate::store::JobStore;

/// Mutex-serialized in-memory implementation of [`JobStore`].
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: &JobId) -> AppError {
        AppError::not_found(format!("Job '{id}' does not exist"))
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, submit: SubmitJob) -> AppResult<Job> {
        let now = Utc::now();
        let job = Job {
            id: JobId::generate(),
            job_type: submit.job_type,
            status: JobStatus::Pending,
            request: submit.request,
            result: None,
            error_message: None,
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        };

        let mut jobs = self.jobs.lock().await;
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn delete(&self, id: &JobId) -> AppResult<()> {
        let mut jobs = self.jobs.lock().await;
        jobs.remove(id);
        Ok(())
    }

    async fn select_all(&self) -> AppResult<Vec<Job>> {
        let jobs = self.jobs.lock().await;
        Ok(jobs.values().cloned().collect())
    }

    async fn select_by_id(&self, id: &JobId) -> AppResult<Job> {
        let jobs = self.jobs.lock().await;
        jobs.get(id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn acquire_job(&self, id: &JobId) -> AppResult<bool> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(id).ok_or_else(|| Self::not_found(id))?;

        if job.status != JobStatus::Pending {
            return Ok(false);
        }

        job.status = JobStatus::InProgress;
        job.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_job_status(&self, id: &JobId, status: JobStatus) -> AppResult<()> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        job.status = status;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn set_job_result(&self, id: &JobId, result: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        job.result = Some(result.to_string());
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn set_job_error(&self, id: &JobId, message: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        job.error_message = Some(message.to_string());
        job.status = JobStatus::Error;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn set_meta(&self, id: &JobId, key: &str, value: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        job.metadata.insert(key.to_string(), value.to_string());
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn get_meta(&self, id: &JobId) -> AppResult<BTreeMap<String, String>> {
        let jobs = self.jobs.lock().await;
        jobs.get(id)
            .map(|job| job.metadata.clone())
            .ok_or_else(|| Self::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn insert_assigns_id_and_pending_status() {
        let store = MemoryJobStore::new();
        let job = store
            .insert(SubmitJob::new("create_environment", r#"{"name":"dev"}"#))
            .await
            .unwrap();

        assert!(!job.id.as_str().is_empty());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.job_type, "create_environment");
        assert!(job.result.is_none());
        assert!(job.error_message.is_none());

        let loaded = store.select_by_id(&job.id).await.unwrap();
        assert_eq!(loaded.request, r#"{"name":"dev"}"#);
    }

    #[tokio::test]
    async fn select_by_id_unknown_is_not_found() {
        let store = MemoryJobStore::new();
        let err = store.select_by_id(&JobId::from("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryJobStore::new();
        let job = store.insert(SubmitJob::new("noop", "")).await.unwrap();

        store.delete(&job.id).await.unwrap();
        // Second delete of the same id must not error.
        store.delete(&job.id).await.unwrap();

        assert!(store.select_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn acquire_transitions_pending_to_in_progress_once() {
        let store = MemoryJobStore::new();
        let job = store.insert(SubmitJob::new("noop", "")).await.unwrap();

        assert!(store.acquire_job(&job.id).await.unwrap());
        // The job left Pending, so a second acquire loses the race.
        assert!(!store.acquire_job(&job.id).await.unwrap());

        let loaded = store.select_by_id(&job.id).await.unwrap();
        assert_eq!(loaded.status, JobStatus::InProgress);
    }

    #[tokio::test]
    async fn acquire_unknown_is_not_found() {
        let store = MemoryJobStore::new();
        let err = store.acquire_job(&JobId::from("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn set_error_records_message_and_status() {
        let store = MemoryJobStore::new();
        let job = store.insert(SubmitJob::new("noop", "")).await.unwrap();
        store.acquire_job(&job.id).await.unwrap();

        store.set_job_error(&job.id, "boom").await.unwrap();

        let loaded = store.select_by_id(&job.id).await.unwrap();
        assert_eq!(loaded.status, JobStatus::Error);
        assert_eq!(loaded.error_message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn result_and_completion() {
        let store = MemoryJobStore::new();
        let job = store.insert(SubmitJob::new("noop", "")).await.unwrap();
        store.acquire_job(&job.id).await.unwrap();

        store.set_job_result(&job.id, "env-12345").await.unwrap();
        store
            .set_job_status(&job.id, JobStatus::Completed)
            .await
            .unwrap();

        let loaded = store.select_by_id(&job.id).await.unwrap();
        assert_eq!(loaded.status, JobStatus::Completed);
        assert_eq!(loaded.result.as_deref(), Some("env-12345"));
    }

    #[tokio::test]
    async fn metadata_accumulates() {
        let store = MemoryJobStore::new();
        let job = store.insert(SubmitJob::new("create_task", "")).await.unwrap();

        store.set_meta(&job.id, "task_id", "t-1").await.unwrap();
        store.set_meta(&job.id, "deploy_id", "d-1").await.unwrap();
        store.set_meta(&job.id, "task_id", "t-2").await.unwrap();

        let meta = store.get_meta(&job.id).await.unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("task_id").map(String::as_str), Some("t-2"));
        assert_eq!(meta.get("deploy_id").map(String::as_str), Some("d-1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_acquisition_has_exactly_one_winner() {
        let store = Arc::new(MemoryJobStore::new());
        let job = store.insert(SubmitJob::new("noop", "")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let id = job.id.clone();
            handles.push(tokio::spawn(
                async move { store.acquire_job(&id).await.unwrap() },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        let loaded = store.select_by_id(&job.id).await.unwrap();
        assert_eq!(loaded.status, JobStatus::InProgress);
    }
}
