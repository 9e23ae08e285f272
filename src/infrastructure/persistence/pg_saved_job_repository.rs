//! PostgreSQL implementation of saved jobs.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::SavedJob;
use crate::domain::repositories::SavedJobRepository;
use crate::error::AppError;

pub struct PgSavedJobRepository {
    pool: Arc<PgPool>,
}

impl PgSavedJobRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedJobRepository for PgSavedJobRepository {
    async fn save(
        &self,
        job_seeker_id: i64,
        job_posting_id: i64,
        notes: Option<String>,
    ) -> Result<bool, AppError> {
        // The unique pair makes concurrent saves collapse into one row.
        let result = sqlx::query(
            r#"
            INSERT INTO saved_jobs (job_seeker_id, job_posting_id, notes)
            VALUES ($1, $2, $3)
            ON CONFLICT (job_seeker_id, job_posting_id) DO NOTHING
            "#,
        )
        .bind(job_seeker_id)
        .bind(job_posting_id)
        .bind(notes)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, job_seeker_id: i64, job_posting_id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM saved_jobs WHERE job_seeker_id = $1 AND job_posting_id = $2")
                .bind(job_seeker_id)
                .bind(job_posting_id)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        job_seeker_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SavedJob>, AppError> {
        let saved = sqlx::query_as::<_, SavedJob>(
            r#"
            SELECT s.id, s.job_posting_id, s.notes, s.created_at AS saved_at,
                   j.title, j.slug, c.name AS company_name, j.location, j.job_type, j.status
            FROM saved_jobs s
            JOIN job_postings j ON j.id = s.job_posting_id AND j.deleted_at IS NULL
            JOIN companies c ON c.id = j.company_id
            WHERE s.job_seeker_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(job_seeker_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(saved)
    }

    async fn count(&self, job_seeker_id: i64) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM saved_jobs s
            JOIN job_postings j ON j.id = s.job_posting_id AND j.deleted_at IS NULL
            WHERE s.job_seeker_id = $1
            "#,
        )
        .bind(job_seeker_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }
}
