//! Outbound SMS with delivery logging.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::entities::{NewSmsLog, SmsStatus, User};
use crate::domain::repositories::NotificationLogRepository;
use crate::error::AppError;
use crate::infrastructure::notify::{SmsGateway, SmsReceipt};

/// `message_type` recorded for verification codes.
pub const OTP_MESSAGE_TYPE: &str = "otp";

/// Sends SMS through the configured gateway and tracks each message in
/// `sms_logs`. Unlike email, delivery errors are returned to the caller.
pub struct SmsService<N: NotificationLogRepository> {
    logs: Arc<N>,
    gateway: Arc<dyn SmsGateway>,
    app_name: String,
}

impl<N: NotificationLogRepository> SmsService<N> {
    pub fn new(logs: Arc<N>, gateway: Arc<dyn SmsGateway>, app_name: String) -> Self {
        Self {
            logs,
            gateway,
            app_name,
        }
    }

    pub fn otp_message(&self, code: &str, expiry_minutes: i64) -> String {
        format!(
            "Your {} verification code is {code}. It expires in {expiry_minutes} minutes.",
            self.app_name
        )
    }

    /// Sends a verification code to the user's phone.
    pub async fn send_otp(
        &self,
        user: &User,
        code: &str,
        expiry_minutes: i64,
    ) -> Result<SmsReceipt, AppError> {
        let Some(phone) = user.phone.as_deref() else {
            return Err(AppError::bad_request(
                "User has no phone number",
                json!({}),
            ));
        };

        let message = self.otp_message(code, expiry_minutes);
        self.send_sms(Some(user.id), phone, &message, OTP_MESSAGE_TYPE)
            .await
    }

    pub async fn send_sms(
        &self,
        user_id: Option<i64>,
        phone: &str,
        message: &str,
        message_type: &str,
    ) -> Result<SmsReceipt, AppError> {
        let log_id = self
            .logs
            .create_sms_log(NewSmsLog {
                user_id,
                to_phone: phone.to_string(),
                message: message.to_string(),
                message_type: message_type.to_string(),
                gateway: self.gateway.name().to_string(),
            })
            .await?;

        match self.gateway.send(phone, message).await {
            Ok(receipt) => {
                info!(
                    to = %phone,
                    message_type,
                    message_id = ?receipt.message_id,
                    "SMS sent"
                );
                self.logs
                    .mark_sms_sent(log_id, receipt.message_id.clone(), receipt.response.clone())
                    .await?;
                Ok(receipt)
            }
            Err(e) => {
                error!(to = %phone, message_type, error = %e, "SMS delivery failed");
                if let Err(log_err) = self.logs.mark_sms_failed(log_id, &e.to_string()).await {
                    warn!(error = %log_err, id = log_id, "Failed to mark SMS log as failed");
                }
                Err(AppError::internal(
                    "Failed to send SMS",
                    json!({ "reason": e.to_string() }),
                ))
            }
        }
    }

    /// Applies a gateway delivery receipt.
    ///
    /// Returns `false` for statuses that carry no final outcome and for
    /// unknown message ids.
    pub async fn handle_delivery_receipt(
        &self,
        message_id: &str,
        status: &str,
    ) -> Result<bool, AppError> {
        let Some(status) = SmsStatus::from_receipt(status) else {
            info!(message_id, status, "Ignoring intermediate SMS receipt");
            return Ok(false);
        };

        let updated = self.logs.update_sms_delivery(message_id, status).await?;
        if !updated {
            warn!(message_id, "Delivery receipt for unknown SMS");
        }
        Ok(updated)
    }
}
