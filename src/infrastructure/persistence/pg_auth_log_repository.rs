//! PostgreSQL implementation of the authentication audit log.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::NewAuthLog;
use crate::domain::repositories::AuthLogRepository;
use crate::error::AppError;

pub struct PgAuthLogRepository {
    pool: Arc<PgPool>,
}

impl PgAuthLogRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthLogRepository for PgAuthLogRepository {
    async fn record(&self, entry: NewAuthLog) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO authentication_logs (
                user_id, email, action, ip_address, user_agent, success, failure_reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.email)
        .bind(entry.action.as_str())
        .bind(&entry.client.ip)
        .bind(&entry.client.user_agent)
        .bind(entry.success)
        .bind(&entry.failure_reason)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn recent_failures(&self, email: &str, minutes: i64) -> Result<i64, AppError> {
        let failures: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM authentication_logs
            WHERE LOWER(email) = LOWER($1)
              AND success = FALSE
              AND created_at >= NOW() - make_interval(mins => $2::int)
            "#,
        )
        .bind(email)
        .bind(minutes)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(failures)
    }
}
