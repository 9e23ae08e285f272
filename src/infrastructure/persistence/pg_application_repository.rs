//! PostgreSQL implementation of the application repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{
    ApplicationFilter, ApplicationStatus, JobApplication, NewApplication, StatusChange,
    StatusHistoryEntry,
};
use crate::domain::repositories::ApplicationRepository;
use crate::error::AppError;

const APPLICATION_SELECT: &str = r#"
    SELECT a.id, a.uuid, a.job_posting_id, j.title AS job_title, j.company_id,
           c.name AS company_name, a.job_seeker_id,
           u.first_name || ' ' || u.last_name AS applicant_name, u.email AS applicant_email,
           a.cover_letter, a.expected_salary, a.status, a.rejection_reason, a.notes,
           a.reviewed_by, a.applied_at, a.updated_at
    FROM job_applications a
    JOIN job_postings j ON j.id = a.job_posting_id
    JOIN companies c ON c.id = j.company_id
    JOIN job_seekers s ON s.id = a.job_seeker_id
    JOIN users u ON u.id = s.user_id
"#;

pub struct PgApplicationRepository {
    pool: Arc<PgPool>,
}

impl PgApplicationRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<JobApplication, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Application not found", json!({ "id": id })))
    }

    async fn list_where(
        &self,
        scope_column: &'static str,
        scope_id: i64,
        filter: ApplicationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(APPLICATION_SELECT);
        push_scope(&mut builder, scope_column, scope_id, &filter);
        builder
            .push(" ORDER BY a.applied_at DESC, a.id DESC OFFSET ")
            .push_bind(offset)
            .push(" LIMIT ")
            .push_bind(limit);

        let applications = builder
            .build_query_as::<JobApplication>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(applications)
    }

    async fn count_where(
        &self,
        scope_column: &'static str,
        scope_id: i64,
        filter: ApplicationFilter,
    ) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*)
            FROM job_applications a
            JOIN job_postings j ON j.id = a.job_posting_id
            "#,
        );
        push_scope(&mut builder, scope_column, scope_id, &filter);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }
}

fn push_scope(
    builder: &mut QueryBuilder<'_, Postgres>,
    scope_column: &'static str,
    scope_id: i64,
    filter: &ApplicationFilter,
) {
    builder
        .push(" WHERE a.deleted_at IS NULL AND ")
        .push(scope_column)
        .push(" = ")
        .push_bind(scope_id);

    if let Some(job_id) = filter.job_posting_id {
        builder.push(" AND a.job_posting_id = ").push_bind(job_id);
    }

    if let Some(status) = filter.status {
        builder.push(" AND a.status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(&self, new_application: NewApplication) -> Result<JobApplication, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_applications (
                uuid, job_posting_id, job_seeker_id, cover_letter, expected_salary, status
            )
            VALUES ($1, $2, $3, $4, $5, 'submitted')
            RETURNING id
            "#,
        )
        .bind(new_application.uuid)
        .bind(new_application.job_posting_id)
        .bind(new_application.job_seeker_id)
        .bind(&new_application.cover_letter)
        .bind(new_application.expected_salary)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match crate::error::map_sqlx_error(e) {
            AppError::Conflict { .. } => AppError::conflict(
                "You have already applied for this job",
                json!({ "job_posting_id": new_application.job_posting_id }),
            ),
            other => other,
        })?;

        sqlx::query(
            r#"
            UPDATE job_postings
            SET applications_count = applications_count + 1
            WHERE id = $1
            "#,
        )
        .bind(new_application.job_posting_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO application_status_history (application_id, from_status, to_status)
            VALUES ($1, NULL, $2)
            "#,
        )
        .bind(id)
        .bind(ApplicationStatus::Submitted.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.fetch(id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<JobApplication>, AppError> {
        let sql = format!("{APPLICATION_SELECT} WHERE a.id = $1 AND a.deleted_at IS NULL");

        let application = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(application)
    }

    async fn list_for_seeker(
        &self,
        job_seeker_id: i64,
        filter: ApplicationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>, AppError> {
        self.list_where("a.job_seeker_id", job_seeker_id, filter, offset, limit)
            .await
    }

    async fn count_for_seeker(
        &self,
        job_seeker_id: i64,
        filter: ApplicationFilter,
    ) -> Result<i64, AppError> {
        self.count_where("a.job_seeker_id", job_seeker_id, filter)
            .await
    }

    async fn list_for_company(
        &self,
        company_id: i64,
        filter: ApplicationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<JobApplication>, AppError> {
        self.list_where("j.company_id", company_id, filter, offset, limit)
            .await
    }

    async fn count_for_company(
        &self,
        company_id: i64,
        filter: ApplicationFilter,
    ) -> Result<i64, AppError> {
        self.count_where("j.company_id", company_id, filter).await
    }

    async fn change_status(&self, change: StatusChange) -> Result<JobApplication, AppError> {
        let mut tx = self.pool.begin().await?;

        // Compare-and-set on the previous status guards against concurrent reviewers.
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET status = $3,
                rejection_reason = COALESCE($4, rejection_reason),
                reviewed_by = CASE WHEN $3 = 'withdrawn' THEN reviewed_by ELSE $5 END,
                updated_at = NOW()
            WHERE id = $1 AND status = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(change.application_id)
        .bind(change.from.as_str())
        .bind(change.to.as_str())
        .bind(&change.rejection_reason)
        .bind(change.changed_by)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "Application status changed concurrently",
                json!({
                    "application_id": change.application_id,
                    "expected_status": change.from.as_str(),
                }),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO application_status_history (
                application_id, from_status, to_status, changed_by, note
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(change.application_id)
        .bind(change.from.as_str())
        .bind(change.to.as_str())
        .bind(change.changed_by)
        .bind(&change.note)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.fetch(change.application_id).await
    }

    async fn history(&self, application_id: i64) -> Result<Vec<StatusHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, StatusHistoryEntry>(
            r#"
            SELECT id, from_status, to_status, changed_by, note, created_at
            FROM application_status_history
            WHERE application_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(application_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(entries)
    }
}
