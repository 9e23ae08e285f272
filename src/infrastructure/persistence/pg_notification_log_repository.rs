//! PostgreSQL implementation of email and SMS delivery logs.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewEmailLog, NewSmsLog, SmsStatus};
use crate::domain::repositories::NotificationLogRepository;
use crate::error::AppError;

pub struct PgNotificationLogRepository {
    pool: Arc<PgPool>,
}

impl PgNotificationLogRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLogRepository for PgNotificationLogRepository {
    async fn create_email_log(&self, entry: NewEmailLog) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO email_logs (user_id, to_email, subject, template, status)
            VALUES ($1, $2, $3, $4, 'queued')
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.to_email)
        .bind(&entry.subject)
        .bind(&entry.template)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn mark_email_sent(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE email_logs SET status = 'sent', sent_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn mark_email_failed(&self, id: i64, error: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE email_logs
            SET status = 'failed', error_message = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create_sms_log(&self, entry: NewSmsLog) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sms_logs (user_id, to_phone, message, message_type, gateway, status)
            VALUES ($1, $2, $3, $4, $5, 'queued')
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.to_phone)
        .bind(&entry.message)
        .bind(&entry.message_type)
        .bind(&entry.gateway)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(id)
    }

    async fn mark_sms_sent(
        &self,
        id: i64,
        message_id: Option<String>,
        gateway_response: Value,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE sms_logs
            SET status = 'sent', message_id = $2, gateway_response = $3,
                sent_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(message_id)
        .bind(gateway_response)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn mark_sms_failed(&self, id: i64, error: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE sms_logs
            SET status = 'failed', error_message = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update_sms_delivery(
        &self,
        message_id: &str,
        status: SmsStatus,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sms_logs
            SET status = $2,
                delivered_at = CASE WHEN $2 = 'delivered' THEN NOW() ELSE delivered_at END,
                updated_at = NOW()
            WHERE message_id = $1
            "#,
        )
        .bind(message_id)
        .bind(status.as_str())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
