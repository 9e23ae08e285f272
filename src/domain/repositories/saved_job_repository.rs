//! Repository trait for job seekers' saved jobs.

use async_trait::async_trait;

use crate::domain::entities::SavedJob;
use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedJobRepository: Send + Sync {
    /// Saves a job. Returns `false` when it was already saved.
    async fn save(
        &self,
        job_seeker_id: i64,
        job_posting_id: i64,
        notes: Option<String>,
    ) -> Result<bool, AppError>;

    /// Returns `false` when nothing was saved.
    async fn remove(&self, job_seeker_id: i64, job_posting_id: i64) -> Result<bool, AppError>;

    async fn list(
        &self,
        job_seeker_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SavedJob>, AppError>;

    async fn count(&self, job_seeker_id: i64) -> Result<i64, AppError>;
}
