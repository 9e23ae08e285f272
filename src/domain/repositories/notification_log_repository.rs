//! Repository trait for email and SMS delivery logs.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{NewEmailLog, NewSmsLog, SmsStatus};
use crate::error::AppError;

/// Delivery bookkeeping for outbound notifications.
///
/// Rows start as `queued` and move to `sent` or `failed` once the transport
/// answers; SMS rows can later move to `delivered` or `expired` through
/// gateway receipts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    async fn create_email_log(&self, entry: NewEmailLog) -> Result<i64, AppError>;

    async fn mark_email_sent(&self, id: i64) -> Result<(), AppError>;

    async fn mark_email_failed(&self, id: i64, error: &str) -> Result<(), AppError>;

    async fn create_sms_log(&self, entry: NewSmsLog) -> Result<i64, AppError>;

    async fn mark_sms_sent(
        &self,
        id: i64,
        message_id: Option<String>,
        gateway_response: Value,
    ) -> Result<(), AppError>;

    async fn mark_sms_failed(&self, id: i64, error: &str) -> Result<(), AppError>;

    /// Applies a delivery receipt. Returns `false` when no row has the id.
    async fn update_sms_delivery(
        &self,
        message_id: &str,
        status: SmsStatus,
    ) -> Result<bool, AppError>;
}
