//! Audit and delivery records: authentication attempts, emails and SMS.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::enums::{EmailStatus, SmsStatus};

/// Kind of authentication event being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
    Logout,
    Refresh,
    PasswordReset,
}

impl AuthAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Logout => "logout",
            Self::Refresh => "refresh",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// Request metadata attached to audit rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAuthLog {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub action: AuthAction,
    pub client: ClientInfo,
    pub success: bool,
    pub failure_reason: Option<String>,
}

impl NewAuthLog {
    pub fn success(action: AuthAction, user_id: i64, email: &str, client: &ClientInfo) -> Self {
        Self {
            user_id: Some(user_id),
            email: Some(email.to_string()),
            action,
            client: client.clone(),
            success: true,
            failure_reason: None,
        }
    }

    pub fn failure(
        action: AuthAction,
        user_id: Option<i64>,
        email: &str,
        client: &ClientInfo,
        reason: &str,
    ) -> Self {
        Self {
            user_id,
            email: Some(email.to_string()),
            action,
            client: client.clone(),
            success: false,
            failure_reason: Some(reason.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EmailLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub to_email: String,
    pub subject: String,
    pub template: String,
    #[sqlx(try_from = "String")]
    pub status: EmailStatus,
    pub error_message: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmailLog {
    pub user_id: Option<i64>,
    pub to_email: String,
    pub subject: String,
    pub template: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SmsLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub to_phone: String,
    pub message: String,
    pub message_type: String,
    pub gateway: String,
    pub message_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: SmsStatus,
    pub error_message: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSmsLog {
    pub user_id: Option<i64>,
    pub to_phone: String,
    pub message: String,
    pub message_type: String,
    pub gateway: String,
}
