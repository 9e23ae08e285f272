//! User account entity and lockout/verification rules.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::enums::UserRole;

/// A registered account.
///
/// Secrets (`password_hash`, verification token and OTP) never leave the
/// server: they are skipped during serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub is_active: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub email_verification_token: Option<String>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub phone_verification_code: Option<String>,
    #[serde(skip)]
    pub phone_verification_expires_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub failed_login_attempts: i32,
    #[serde(skip)]
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lock state evaluated at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    /// The stored lock has passed and should be cleared.
    Expired,
    Locked { until: DateTime<Utc> },
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_verified_email(&self) -> bool {
        self.email_verified_at.is_some()
    }

    pub fn has_verified_phone(&self) -> bool {
        self.phone_verified_at.is_some()
    }

    pub fn lock_state(&self, now: DateTime<Utc>) -> LockState {
        match self.locked_until {
            None => LockState::Unlocked,
            Some(until) if until > now => LockState::Locked { until },
            Some(_) => LockState::Expired,
        }
    }

    /// Checks a submitted OTP against the stored code and its expiry.
    pub fn otp_matches(&self, otp: &str, now: DateTime<Utc>) -> bool {
        match (
            &self.phone_verification_code,
            self.phone_verification_expires_at,
        ) {
            (Some(code), Some(expires_at)) => code == otp && expires_at > now,
            _ => false,
        }
    }
}

/// Remaining time of an active lock, as shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockRemaining {
    pub locked_until: DateTime<Utc>,
    pub remaining_seconds: i64,
    pub remaining_minutes: i64,
}

impl LockRemaining {
    pub fn new(locked_until: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining_seconds = (locked_until - now).num_seconds().max(0);
        Self {
            locked_until,
            remaining_seconds,
            // Rounded up so a lock with 30s left reads as one minute
            remaining_minutes: (remaining_seconds + 59) / 60,
        }
    }
}

/// Outcome of recording a failed password attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedLogin {
    /// Failed attempts after this one; reset to 0 when the account got locked.
    pub attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl FailedLogin {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

/// Job seeker profile attached to a user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobSeeker {
    pub id: i64,
    pub user_id: i64,
    pub bio: Option<String>,
    pub current_job_title: Option<String>,
    pub years_of_experience: Option<i32>,
    pub current_location: Option<String>,
    pub resume_url: Option<String>,
    pub is_available: bool,
    pub profile_completion_percentage: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile completion assigned to a freshly registered job seeker.
pub const INITIAL_PROFILE_COMPLETION: i32 = 20;

/// Company details captured when an employer registers.
#[derive(Debug, Clone)]
pub struct NewCompanyProfile {
    pub name: String,
    pub slug: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub industry_id: Option<i64>,
}

/// Everything needed to create an account in one transaction.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub email_verification_token: String,
    /// Present for employers. Job seekers get a profile row instead.
    pub company: Option<NewCompanyProfile>,
}

/// Computes the expiry instant of a lock starting now.
pub fn lock_expiry(now: DateTime<Utc>, lockout_duration_secs: i64) -> DateTime<Utc> {
    now + Duration::seconds(lockout_duration_secs)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(id: i64) -> User {
        let now = Utc::now();
        User {
            id,
            uuid: Uuid::new_v4(),
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            email: format!("user{id}@example.com"),
            phone: Some(format!("+2547000000{id:02}")),
            password_hash: String::new(),
            role: UserRole::JobSeeker,
            is_active: true,
            email_notifications: true,
            sms_notifications: true,
            email_verified_at: None,
            email_verification_token: Some("t".repeat(64)),
            phone_verified_at: None,
            phone_verification_code: None,
            phone_verification_expires_at: None,
            failed_login_attempts: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
