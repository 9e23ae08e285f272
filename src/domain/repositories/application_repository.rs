//! Repository trait for job applications.

use async_trait::async_trait;

use crate::domain::entities::{
    ApplicationFilter, JobApplication, NewApplication, StatusChange, StatusHistoryEntry,
};
use crate::error::AppError;

/// Persistence for applications and their status history.
///
/// Writes that change an application also write a history row in the same
/// transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts the application, bumps the posting's `applications_count` and
    /// records the initial `submitted` status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the seeker already has a live
    /// application for the posting.
    async fn create(&self, new_application: NewApplication) -> Result<JobApplication, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<JobApplication>, AppError>;

    async fn list_for_seeker(
        &self,
        job_seeker_id: i64,
        filter: ApplicationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>, AppError>;

    async fn count_for_seeker(
        &self,
        job_seeker_id: i64,
        filter: ApplicationFilter,
    ) -> Result<i64, AppError>;

    async fn list_for_company(
        &self,
        company_id: i64,
        filter: ApplicationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>, AppError>;

    async fn count_for_company(
        &self,
        company_id: i64,
        filter: ApplicationFilter,
    ) -> Result<i64, AppError>;

    /// Applies a status change if the stored status still equals `change.from`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the status changed concurrently.
    async fn change_status(&self, change: StatusChange) -> Result<JobApplication, AppError>;

    async fn history(&self, application_id: i64) -> Result<Vec<StatusHistoryEntry>, AppError>;
}
