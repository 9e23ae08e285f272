//! Email verification, phone OTP and password reset flows.

use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::email_service::EmailService;
use super::sms_service::SmsService;
use crate::config::SecuritySettings;
use crate::domain::entities::{AuthAction, ClientInfo, NewAuthLog};
use crate::domain::repositories::{
    AuthLogRepository, NotificationLogRepository, PasswordResetRepository, UserRepository,
};
use crate::error::AppError;
use crate::utils::password::hash_password;
use crate::utils::secrets::{OTP_LENGTH, generate_otp, generate_token, hash_token, verify_token};

/// Result of a verification request that may already have been satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    AlreadyVerified,
}

pub struct VerificationService<U, P, L, N>
where
    U: UserRepository,
    P: PasswordResetRepository,
    L: AuthLogRepository,
    N: NotificationLogRepository,
{
    users: Arc<U>,
    resets: Arc<P>,
    auth_logs: Arc<L>,
    email: Arc<EmailService<N>>,
    sms: Arc<SmsService<N>>,
    security: SecuritySettings,
    signing_secret: String,
}

impl<U, P, L, N> VerificationService<U, P, L, N>
where
    U: UserRepository,
    P: PasswordResetRepository,
    L: AuthLogRepository,
    N: NotificationLogRepository,
{
    pub fn new(
        users: Arc<U>,
        resets: Arc<P>,
        auth_logs: Arc<L>,
        email: Arc<EmailService<N>>,
        sms: Arc<SmsService<N>>,
        security: SecuritySettings,
        signing_secret: String,
    ) -> Self {
        Self {
            users,
            resets,
            auth_logs,
            email,
            sms,
            security,
            signing_secret,
        }
    }

    /// Confirms an email address from the link sent at registration and
    /// sends the welcome email.
    pub async fn verify_email(&self, token: &str) -> Result<Verification, AppError> {
        let user = self
            .users
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| {
                AppError::bad_request("Invalid or expired verification token", json!({}))
            })?;

        if user.has_verified_email() {
            return Ok(Verification::AlreadyVerified);
        }

        self.users.mark_email_verified(user.id).await?;
        info!(user_id = user.id, "Email verified");

        if !self.email.send_welcome_email(&user).await {
            warn!(user_id = user.id, "Welcome email was not delivered");
        }

        Ok(Verification::Verified)
    }

    /// Generates, stores and texts a new OTP. Returns its lifetime in seconds.
    pub async fn send_otp(&self, phone: &str) -> Result<i64, AppError> {
        let user = self
            .users
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::not_found("Phone number not found", json!({})))?;

        if user.has_verified_phone() {
            return Err(AppError::bad_request(
                "Phone number already verified",
                json!({}),
            ));
        }

        let code = generate_otp();
        let expiry_minutes = self.security.otp_expiry_minutes;
        let expires_at = Utc::now() + Duration::minutes(expiry_minutes);
        self.users
            .store_phone_otp(user.id, &code, expires_at)
            .await?;

        self.sms
            .send_otp(&user, &code, expiry_minutes)
            .await
            .map_err(|e| {
                warn!(user_id = user.id, error = %e, "OTP delivery failed");
                AppError::internal("Failed to send OTP. Please try again.", json!({}))
            })?;

        Ok(expiry_minutes * 60)
    }

    pub async fn verify_phone(&self, phone: &str, otp: &str) -> Result<Verification, AppError> {
        if otp.len() != OTP_LENGTH {
            return Err(AppError::invalid_field(
                "otp",
                format!("The otp must be {OTP_LENGTH} characters."),
            ));
        }

        let user = self
            .users
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::not_found("Phone number not found", json!({})))?;

        if user.has_verified_phone() {
            return Ok(Verification::AlreadyVerified);
        }

        if !user.otp_matches(otp, Utc::now()) {
            return Err(AppError::bad_request("Invalid or expired OTP", json!({})));
        }

        self.users.mark_phone_verified(user.id).await?;
        info!(user_id = user.id, "Phone verified");
        Ok(Verification::Verified)
    }

    /// Emails a reset link. Unknown addresses succeed silently.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_token()?;
        self.resets
            .store(&user.email, &hash_token(&self.signing_secret, &token))
            .await?;

        if !self.email.send_password_reset_email(&user, &token).await {
            warn!(user_id = user.id, "Password reset email was not delivered");
        }
        Ok(())
    }

    /// Sets a new password from a reset link and lifts any lockout.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        password: String,
        client: &ClientInfo,
    ) -> Result<(), AppError> {
        let invalid = || AppError::bad_request("Invalid or expired reset token", json!({}));

        let stored = self.resets.find(email).await?.ok_or_else(invalid)?;
        let max_age = Duration::minutes(self.security.password_reset_expiry_minutes);

        if stored.created_at + max_age < Utc::now()
            || !verify_token(&self.signing_secret, token, &stored.token_hash)
        {
            return Err(invalid());
        }

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        let password_hash = hash_password(password).await?;
        self.users.update_password(user.id, &password_hash).await?;
        self.resets.delete(email).await?;

        if let Err(e) = self
            .auth_logs
            .record(NewAuthLog::success(
                AuthAction::PasswordReset,
                user.id,
                &user.email,
                client,
            ))
            .await
        {
            warn!(error = %e, "Failed to write authentication log");
        }

        info!(user_id = user.id, "Password reset");
        Ok(())
    }
}
