//! PostgreSQL implementation of the job posting repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    JobFilter, JobPatch, JobPosting, JobStatus, NewJobPosting, Skill,
};
use crate::domain::repositories::JobRepository;
use crate::error::AppError;
use crate::utils::slug::unique_slug;

const JOB_SELECT: &str = r#"
    SELECT j.id, j.uuid, j.company_id, c.name AS company_name, c.slug AS company_slug,
           j.posted_by_user_id, j.industry_id, i.name AS industry_name,
           j.title, j.slug, j.description, j.requirements, j.responsibilities, j.benefits,
           j.job_type, j.experience_level, j.location, j.is_remote,
           j.salary_min, j.salary_max, j.salary_currency, j.salary_period, j.salary_negotiable,
           j.positions_available, j.application_deadline, j.status, j.published_at,
           j.expires_at, j.is_featured, j.is_urgent, j.views_count, j.applications_count,
           j.created_at, j.updated_at
    FROM job_postings j
    JOIN companies c ON c.id = j.company_id
    LEFT JOIN industries i ON i.id = j.industry_id
"#;

const OPEN_PREDICATE: &str = r#"
    j.deleted_at IS NULL
    AND c.deleted_at IS NULL
    AND j.status = 'active'
    AND (j.expires_at IS NULL OR j.expires_at > NOW())
"#;

const LISTING_ORDER: &str = " ORDER BY j.is_featured DESC, j.is_urgent DESC, j.created_at DESC, j.id DESC";

/// PostgreSQL repository for job postings and their skill pivot rows.
pub struct PgJobRepository {
    pool: Arc<PgPool>,
}

impl PgJobRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads skills for every posting in `jobs` with a single query.
    async fn attach_skills(&self, jobs: &mut [JobPosting]) -> Result<(), AppError> {
        if jobs.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();

        let rows: Vec<(i64, i64, String, String)> = sqlx::query_as(
            r#"
            SELECT ps.job_posting_id, s.id, s.name, s.slug
            FROM job_posting_skill ps
            JOIN skills s ON s.id = ps.skill_id
            WHERE ps.job_posting_id = ANY($1)
            ORDER BY s.name
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_job: HashMap<i64, Vec<Skill>> = HashMap::new();
        for (job_id, id, name, slug) in rows {
            by_job.entry(job_id).or_default().push(Skill { id, name, slug });
        }

        for job in jobs.iter_mut() {
            job.skills = by_job.remove(&job.id).unwrap_or_default();
        }

        Ok(())
    }

    async fn fetch_one_with_skills(&self, id: i64) -> Result<JobPosting, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Job posting not found", json!({ "id": id })))
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE ").push(OPEN_PREDICATE);

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{term}%");
        builder
            .push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(location) = filter.location.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        builder
            .push(" AND j.location ILIKE ")
            .push_bind(format!("%{location}%"));
    }

    if let Some(job_type) = filter.job_type {
        builder.push(" AND j.job_type = ").push_bind(job_type.as_str());
    }

    if let Some(level) = filter.experience_level {
        builder
            .push(" AND j.experience_level = ")
            .push_bind(level.as_str());
    }

    if let Some(industry_id) = filter.industry_id {
        builder.push(" AND j.industry_id = ").push_bind(industry_id);
    }

    if let Some(is_remote) = filter.is_remote {
        builder.push(" AND j.is_remote = ").push_bind(is_remote);
    }

    if let Some(min) = filter.salary_min {
        builder.push(" AND j.salary_max >= ").push_bind(min);
    }

    if let Some(max) = filter.salary_max {
        builder.push(" AND j.salary_min <= ").push_bind(max);
    }
}

async fn replace_skills(
    tx: &mut Transaction<'_, Postgres>,
    job_id: i64,
    skill_ids: &[i64],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM job_posting_skill WHERE job_posting_id = $1")
        .bind(job_id)
        .execute(&mut **tx)
        .await?;

    if !skill_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO job_posting_skill (job_posting_id, skill_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(skill_ids)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn search(
        &self,
        filter: &JobFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(JOB_SELECT);
        push_filter(&mut builder, filter);
        builder
            .push(LISTING_ORDER)
            .push(" OFFSET ")
            .push_bind(offset)
            .push(" LIMIT ")
            .push_bind(limit);

        let mut jobs = builder
            .build_query_as::<JobPosting>()
            .fetch_all(self.pool.as_ref())
            .await?;

        self.attach_skills(&mut jobs).await?;

        Ok(jobs)
    }

    async fn count(&self, filter: &JobFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*)
            FROM job_postings j
            JOIN companies c ON c.id = j.company_id
            "#,
        );
        push_filter(&mut builder, filter);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<JobPosting>, AppError> {
        let sql = format!("{JOB_SELECT} WHERE j.id = $1 AND j.deleted_at IS NULL");

        let job = sqlx::query_as::<_, JobPosting>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        match job {
            Some(job) => {
                let mut jobs = [job];
                self.attach_skills(&mut jobs).await?;
                let [job] = jobs;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    async fn similar(&self, job: &JobPosting, limit: i64) -> Result<Vec<JobPosting>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(JOB_SELECT);
        builder
            .push(" WHERE ")
            .push(OPEN_PREDICATE)
            .push(" AND j.id <> ")
            .push_bind(job.id)
            .push(" AND (j.job_type = ")
            .push_bind(job.job_type.as_str())
            .push(" OR j.location ILIKE ")
            .push_bind(format!("%{}%", job.location));

        if let Some(industry_id) = job.industry_id {
            builder.push(" OR j.industry_id = ").push_bind(industry_id);
        }

        builder
            .push(")")
            .push(LISTING_ORDER)
            .push(" LIMIT ")
            .push_bind(limit);

        let mut jobs = builder
            .build_query_as::<JobPosting>()
            .fetch_all(self.pool.as_ref())
            .await?;

        self.attach_skills(&mut jobs).await?;

        Ok(jobs)
    }

    async fn create(&self, new_job: NewJobPosting) -> Result<JobPosting, AppError> {
        let mut tx = self.pool.begin().await?;

        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM job_postings WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&new_job.slug)
        .fetch_all(&mut *tx)
        .await?;

        let slug = unique_slug(&new_job.slug, &taken);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_postings (
                uuid, company_id, posted_by_user_id, industry_id, title, slug, description,
                requirements, responsibilities, benefits, job_type, experience_level, location,
                is_remote, salary_min, salary_max, salary_currency, salary_period,
                salary_negotiable, positions_available, application_deadline, expires_at,
                is_urgent, status
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, 'draft'
            )
            RETURNING id
            "#,
        )
        .bind(new_job.uuid)
        .bind(new_job.company_id)
        .bind(new_job.posted_by_user_id)
        .bind(new_job.industry_id)
        .bind(&new_job.title)
        .bind(&slug)
        .bind(&new_job.description)
        .bind(&new_job.requirements)
        .bind(&new_job.responsibilities)
        .bind(&new_job.benefits)
        .bind(new_job.job_type.as_str())
        .bind(new_job.experience_level.as_str())
        .bind(&new_job.location)
        .bind(new_job.is_remote)
        .bind(new_job.salary_min)
        .bind(new_job.salary_max)
        .bind(&new_job.salary_currency)
        .bind(new_job.salary_period.as_str())
        .bind(new_job.salary_negotiable)
        .bind(new_job.positions_available)
        .bind(new_job.application_deadline)
        .bind(new_job.expires_at)
        .bind(new_job.is_urgent)
        .fetch_one(&mut *tx)
        .await?;

        replace_skills(&mut tx, id, &new_job.skill_ids).await?;

        tx.commit().await?;

        self.fetch_one_with_skills(id).await
    }

    async fn update(&self, id: i64, patch: JobPatch) -> Result<JobPosting, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE job_postings SET updated_at = NOW()");

        if let Some(title) = patch.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(requirements) = patch.requirements {
            builder.push(", requirements = ").push_bind(requirements);
        }
        if let Some(responsibilities) = patch.responsibilities {
            builder.push(", responsibilities = ").push_bind(responsibilities);
        }
        if let Some(benefits) = patch.benefits {
            builder.push(", benefits = ").push_bind(benefits);
        }
        if let Some(industry_id) = patch.industry_id {
            builder.push(", industry_id = ").push_bind(industry_id);
        }
        if let Some(job_type) = patch.job_type {
            builder.push(", job_type = ").push_bind(job_type.as_str());
        }
        if let Some(level) = patch.experience_level {
            builder.push(", experience_level = ").push_bind(level.as_str());
        }
        if let Some(location) = patch.location {
            builder.push(", location = ").push_bind(location);
        }
        if let Some(is_remote) = patch.is_remote {
            builder.push(", is_remote = ").push_bind(is_remote);
        }
        if let Some(salary_min) = patch.salary_min {
            builder.push(", salary_min = ").push_bind(salary_min);
        }
        if let Some(salary_max) = patch.salary_max {
            builder.push(", salary_max = ").push_bind(salary_max);
        }
        if let Some(currency) = patch.salary_currency {
            builder.push(", salary_currency = ").push_bind(currency);
        }
        if let Some(period) = patch.salary_period {
            builder.push(", salary_period = ").push_bind(period.as_str());
        }
        if let Some(negotiable) = patch.salary_negotiable {
            builder.push(", salary_negotiable = ").push_bind(negotiable);
        }
        if let Some(positions) = patch.positions_available {
            builder.push(", positions_available = ").push_bind(positions);
        }
        if let Some(deadline) = patch.application_deadline {
            builder.push(", application_deadline = ").push_bind(deadline);
        }
        if let Some(expires_at) = patch.expires_at {
            builder.push(", expires_at = ").push_bind(expires_at);
        }
        if let Some(is_urgent) = patch.is_urgent {
            builder.push(", is_urgent = ").push_bind(is_urgent);
        }

        builder
            .push(" WHERE deleted_at IS NULL AND id = ")
            .push_bind(id)
            .push(" RETURNING id");

        let updated: Option<i64> = builder
            .build_query_scalar()
            .fetch_optional(&mut *tx)
            .await?;

        if updated.is_none() {
            return Err(AppError::not_found(
                "Job posting not found",
                json!({ "id": id }),
            ));
        }

        if let Some(skill_ids) = &patch.skill_ids {
            replace_skills(&mut tx, id, skill_ids).await?;
        }

        tx.commit().await?;

        self.fetch_one_with_skills(id).await
    }

    async fn set_status(&self, id: i64, status: JobStatus) -> Result<JobPosting, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE job_postings
            SET status = $2,
                published_at = CASE
                    WHEN $2 = 'active' THEN COALESCE(published_at, NOW())
                    ELSE published_at
                END,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Job posting not found",
                json!({ "id": id }),
            ));
        }

        self.fetch_one_with_skills(id).await
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE job_postings
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_company(
        &self,
        company_id: i64,
        status: Option<JobStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(JOB_SELECT);
        builder
            .push(" WHERE j.deleted_at IS NULL AND j.company_id = ")
            .push_bind(company_id);

        if let Some(status) = status {
            builder.push(" AND j.status = ").push_bind(status.as_str());
        }

        builder
            .push(" ORDER BY j.created_at DESC, j.id DESC OFFSET ")
            .push_bind(offset)
            .push(" LIMIT ")
            .push_bind(limit);

        let mut jobs = builder
            .build_query_as::<JobPosting>()
            .fetch_all(self.pool.as_ref())
            .await?;

        self.attach_skills(&mut jobs).await?;

        Ok(jobs)
    }

    async fn count_for_company(
        &self,
        company_id: i64,
        status: Option<JobStatus>,
    ) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM job_postings WHERE deleted_at IS NULL AND company_id = ",
        );
        builder.push_bind(company_id);

        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn count_created_since(
        &self,
        company_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM job_postings WHERE company_id = $1 AND created_at >= $2",
        )
        .bind(company_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }

    async fn list_open_for_company(
        &self,
        company_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobPosting>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(JOB_SELECT);
        builder
            .push(" WHERE ")
            .push(OPEN_PREDICATE)
            .push(" AND j.company_id = ")
            .push_bind(company_id)
            .push(" ORDER BY j.created_at DESC, j.id DESC OFFSET ")
            .push_bind(offset)
            .push(" LIMIT ")
            .push_bind(limit);

        let mut jobs = builder
            .build_query_as::<JobPosting>()
            .fetch_all(self.pool.as_ref())
            .await?;

        self.attach_skills(&mut jobs).await?;

        Ok(jobs)
    }
}
