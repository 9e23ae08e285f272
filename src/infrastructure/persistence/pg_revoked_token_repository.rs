//! PostgreSQL implementation of the session token blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::RevokedTokenRepository;
use crate::error::AppError;

pub struct PgRevokedTokenRepository {
    pool: Arc<PgPool>,
}

impl PgRevokedTokenRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for PgRevokedTokenRepository {
    async fn revoke(
        &self,
        jti: Uuid,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        // Revoking twice is a no-op.
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(revoked)
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
