//! Repository trait for the authentication audit trail.

use async_trait::async_trait;

use crate::domain::entities::NewAuthLog;
use crate::error::AppError;

/// Append-only log of login, registration and session events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthLogRepository: Send + Sync {
    async fn record(&self, entry: NewAuthLog) -> Result<(), AppError>;

    /// Failed attempts recorded for an email since the given number of minutes.
    async fn recent_failures(&self, email: &str, minutes: i64) -> Result<i64, AppError>;
}
