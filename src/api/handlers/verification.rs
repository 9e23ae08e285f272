//! Handlers for email, phone and password recovery flows.

use axum::{Json, extract::State};

use crate::api::dto::MessageResponse;
use crate::api::dto::auth::{
    ForgotPasswordRequest, OtpSentResponse, ResetPasswordRequest, SendOtpRequest,
    VerifyEmailRequest, VerifyPhoneRequest,
};
use crate::api::extract::{Client, ValidJson};
use crate::application::services::Verification;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /api/auth/verify-email`
///
/// # Errors
///
/// - **400**: Unknown or already used token
pub async fn verify_email_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = match state
        .verification_service
        .verify_email(payload.token.trim())
        .await?
    {
        Verification::Verified => "Email verified successfully",
        Verification::AlreadyVerified => "Email already verified",
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Sends a six-digit verification code by SMS.
///
/// # Endpoint
///
/// `POST /api/auth/send-otp`
///
/// # Response
///
/// ```json
/// { "success": true, "message": "OTP sent successfully", "expires_in": 600 }
/// ```
///
/// # Errors
///
/// - **400**: Phone already verified
/// - **404**: No account with this phone number
/// - **500**: The SMS gateway rejected the message
pub async fn send_otp_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SendOtpRequest>,
) -> Result<Json<OtpSentResponse>, AppError> {
    let expires_in = state
        .verification_service
        .send_otp(payload.phone.trim())
        .await?;

    Ok(Json(OtpSentResponse {
        success: true,
        message: "OTP sent successfully",
        expires_in,
    }))
}

/// `POST /api/auth/verify-phone`
pub async fn verify_phone_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<VerifyPhoneRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = match state
        .verification_service
        .verify_phone(payload.phone.trim(), &payload.otp)
        .await?
    {
        Verification::Verified => "Phone number verified successfully",
        Verification::AlreadyVerified => "Phone number already verified",
    };

    Ok(Json(MessageResponse::new(message)))
}

/// `POST /api/auth/forgot-password`
///
/// Always answers 200 so the endpoint cannot be used to probe for accounts.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .verification_service
        .forgot_password(&payload.email.trim().to_lowercase())
        .await?;

    Ok(Json(MessageResponse::new(
        "If an account exists for this email, a password reset link has been sent.",
    )))
}

/// `POST /api/auth/reset-password`
///
/// # Errors
///
/// - **400**: Token unknown, mismatched or older than the reset window
pub async fn reset_password_handler(
    State(state): State<AppState>,
    client: Client,
    ValidJson(payload): ValidJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .verification_service
        .reset_password(
            &payload.email.trim().to_lowercase(),
            payload.token.trim(),
            payload.password,
            &client.info,
        )
        .await?;

    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}
