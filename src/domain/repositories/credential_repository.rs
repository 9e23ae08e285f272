//! Repository traits for password reset tokens and revoked session tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// A stored password reset request. Only the HMAC of the token is kept.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub email: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One outstanding reset token per email; storing a new one replaces the old.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn store(&self, email: &str, token_hash: &str) -> Result<(), AppError>;

    async fn find(&self, email: &str) -> Result<Option<PasswordResetToken>, AppError>;

    async fn delete(&self, email: &str) -> Result<(), AppError>;
}

/// Blacklist of session tokens ended by logout or refresh.
///
/// Entries only need to live until the token would have expired anyway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    async fn revoke(
        &self,
        jti: Uuid,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn is_revoked(&self, jti: Uuid) -> Result<bool, AppError>;

    /// Deletes entries whose tokens have expired. Returns the number removed.
    async fn purge_expired(&self) -> Result<u64, AppError>;
}
