//! Repository trait for job postings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{JobFilter, JobPatch, JobPosting, JobStatus, NewJobPosting};
use crate::error::AppError;

/// Persistence for job postings.
///
/// All lookups exclude soft-deleted rows. "Open" postings are those with
/// status `active` whose `expires_at` is unset or in the future.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgJobRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Open postings matching `filter`, featured first, then urgent, then newest.
    async fn search(
        &self,
        filter: &JobFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError>;

    /// Total number of open postings matching `filter`.
    async fn count(&self, filter: &JobFilter) -> Result<i64, AppError>;

    /// Finds a posting with its skills.
    async fn find_by_id(&self, id: i64) -> Result<Option<JobPosting>, AppError>;

    /// Open postings other than `job` sharing its industry, type or location.
    async fn similar(&self, job: &JobPosting, limit: i64) -> Result<Vec<JobPosting>, AppError>;

    /// Inserts a posting. The slug in `new_job` is a base that gets a numeric
    /// suffix when already taken.
    async fn create(&self, new_job: NewJobPosting) -> Result<JobPosting, AppError>;

    async fn update(&self, id: i64, patch: JobPatch) -> Result<JobPosting, AppError>;

    /// Changes the status. Moving to `active` stamps `published_at` once.
    async fn set_status(&self, id: i64, status: JobStatus) -> Result<JobPosting, AppError>;

    /// Returns `false` if the posting did not exist or was already deleted.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    async fn list_for_company(
        &self,
        company_id: i64,
        status: Option<JobStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError>;

    async fn count_for_company(
        &self,
        company_id: i64,
        status: Option<JobStatus>,
    ) -> Result<i64, AppError>;

    /// Postings created by a company since `since`, deleted ones included.
    async fn count_created_since(
        &self,
        company_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Open postings of a company, newest first.
    async fn list_open_for_company(
        &self,
        company_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError>;
}
