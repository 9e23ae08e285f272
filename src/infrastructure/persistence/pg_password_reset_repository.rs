//! PostgreSQL implementation of password reset token storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{PasswordResetRepository, PasswordResetToken};
use crate::error::AppError;

/// Stores HMAC digests of reset tokens keyed by lowercase email.
pub struct PgPasswordResetRepository {
    pool: Arc<PgPool>,
}

impl PgPasswordResetRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for PgPasswordResetRepository {
    async fn store(&self, email: &str, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (email, token_hash, created_at)
            VALUES (LOWER($1), $2, NOW())
            ON CONFLICT (email)
            DO UPDATE SET token_hash = EXCLUDED.token_hash, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(email)
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find(&self, email: &str) -> Result<Option<PasswordResetToken>, AppError> {
        let row: Option<(String, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT email, token_hash, created_at FROM password_reset_tokens WHERE email = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|(email, token_hash, created_at)| PasswordResetToken {
            email,
            token_hash,
            created_at,
        }))
    }

    async fn delete(&self, email: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE email = LOWER($1)")
            .bind(email)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
