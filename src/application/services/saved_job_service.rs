//! Jobs bookmarked by job seekers.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::application_service::require_seeker;
use crate::domain::entities::{PageRequest, Paginated, SavedJob, User};
use crate::domain::repositories::{JobRepository, SavedJobRepository, UserRepository};
use crate::error::AppError;

pub struct SavedJobService<U, J, S>
where
    U: UserRepository,
    J: JobRepository,
    S: SavedJobRepository,
{
    users: Arc<U>,
    jobs: Arc<J>,
    saved: Arc<S>,
}

impl<U, J, S> SavedJobService<U, J, S>
where
    U: UserRepository,
    J: JobRepository,
    S: SavedJobRepository,
{
    pub fn new(users: Arc<U>, jobs: Arc<J>, saved: Arc<S>) -> Self {
        Self { users, jobs, saved }
    }

    /// Saves a publicly visible job. Returns `false` when it was already
    /// saved.
    pub async fn save_job(
        &self,
        user: &User,
        job_id: i64,
        notes: Option<String>,
    ) -> Result<bool, AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;

        self.jobs
            .find_by_id(job_id)
            .await?
            .filter(|job| job.status.is_public())
            .ok_or_else(|| AppError::not_found("Job not found", json!({})))?;

        let created = self.saved.save(seeker.id, job_id, notes).await?;
        if created {
            info!(job_id, seeker_id = seeker.id, "Job saved");
        }
        Ok(created)
    }

    /// Removes a saved job. Unsaving twice is not an error.
    pub async fn unsave_job(&self, user: &User, job_id: i64) -> Result<(), AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;
        self.saved.remove(seeker.id, job_id).await?;
        Ok(())
    }

    pub async fn saved_jobs(
        &self,
        user: &User,
        page: PageRequest,
    ) -> Result<Paginated<SavedJob>, AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;

        let total = self.saved.count(seeker.id).await?;
        let items = self
            .saved
            .list(seeker.id, page.offset(), page.limit())
            .await?;

        Ok(Paginated::new(items, page, total))
    }
}
