//! PostgreSQL implementation of job view and search analytics.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{AnalyticsRepository, JobView, SearchRecord};
use crate::error::AppError;

pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn record_job_view(&self, view: JobView) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO job_views (job_posting_id, user_id, ip_address, user_agent, referer)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(view.job_posting_id)
        .bind(view.user_id)
        .bind(&view.ip)
        .bind(&view.user_agent)
        .bind(&view.referer)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE job_postings SET views_count = views_count + 1 WHERE id = $1")
            .bind(view.job_posting_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn record_search(&self, search: SearchRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO search_logs (user_id, query, filters, results_count, ip_address)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(search.user_id)
        .bind(&search.query)
        .bind(&search.filters)
        .bind(search.results_count)
        .bind(&search.ip)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
