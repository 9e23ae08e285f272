//! Repository trait for user accounts and their credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{FailedLogin, JobSeeker, NewUser, User};
use crate::error::AppError;

/// Persistence for accounts, lockout counters and verification state.
///
/// Soft-deleted users are invisible to every lookup.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AppError>;

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AppError>;

    /// Creates the user together with its job seeker profile, or with its
    /// company and owner membership, in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or phone is already taken.
    /// Nothing is persisted on error.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Atomically increments the failed-login counter.
    ///
    /// When the counter reaches `max_attempts` the account is locked until
    /// `lock_until` and the counter is reset to zero.
    async fn record_failed_login(
        &self,
        id: i64,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
    ) -> Result<FailedLogin, AppError>;

    /// Locks the account until `until` and resets the failed-login counter.
    async fn set_lock(&self, id: i64, until: DateTime<Utc>) -> Result<(), AppError>;

    /// Clears both the lock and the failed-login counter.
    async fn clear_lock(&self, id: i64) -> Result<(), AppError>;

    async fn reset_failed_attempts(&self, id: i64) -> Result<(), AppError>;

    /// Resets the failed-login counter and stamps `last_login_at`.
    async fn record_successful_login(&self, id: i64) -> Result<(), AppError>;

    /// Sets `email_verified_at` and drops the verification token.
    async fn mark_email_verified(&self, id: i64) -> Result<(), AppError>;

    async fn store_phone_otp(
        &self,
        id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Sets `phone_verified_at` and drops the OTP and its expiry.
    async fn mark_phone_verified(&self, id: i64) -> Result<(), AppError>;

    /// Replaces the password hash and lifts any lockout.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError>;

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError>;

    async fn find_job_seeker(&self, user_id: i64) -> Result<Option<JobSeeker>, AppError>;

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
