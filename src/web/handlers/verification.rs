//! Email and phone verification and password reset pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::dto::auth::{
    ForgotPasswordRequest, ResetPasswordRequest, SendOtpRequest, VerifyPhoneRequest,
};
use crate::api::extract::Client;
use crate::application::services::Verification;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::cookies::Toast;
use crate::web::page::{PageContext, error_message, redirect_with, render};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TokenQuery {
    pub token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_email.html")]
struct VerifyEmailTemplate {
    page: PageContext,
    verified: bool,
    message: String,
}

/// Landing page for the link in the verification email.
///
/// # Endpoint
///
/// `GET /verify-email?token=...`
pub async fn verify_email_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Response {
    let page = PageContext::new(&state.app_name, &headers, None);

    let (verified, message) = if query.token.trim().is_empty() {
        (false, "The verification link is incomplete.".to_string())
    } else {
        match state.verification_service.verify_email(query.token.trim()).await {
            Ok(Verification::Verified) => (true, "Your email address has been verified.".into()),
            Ok(Verification::AlreadyVerified) => {
                (true, "Your email address is already verified.".into())
            }
            Err(err) => (false, error_message(&err)),
        }
    };

    render(VerifyEmailTemplate {
        page,
        verified,
        message,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_phone.html")]
struct VerifyPhoneTemplate {
    page: PageContext,
    phone: String,
    code_sent: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhoneQuery {
    pub phone: String,
}

/// `GET /verify-phone?phone=...`
pub async fn verify_phone_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PhoneQuery>,
) -> Response {
    render(VerifyPhoneTemplate {
        page: PageContext::new(&state.app_name, &headers, None),
        phone: query.phone.trim().to_string(),
        code_sent: false,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneAction {
    #[default]
    Send,
    Verify,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerifyPhoneForm {
    pub action: PhoneAction,
    pub phone: String,
    pub otp: String,
}

/// Sends a code or checks one, depending on the button pressed.
///
/// # Endpoint
///
/// `POST /verify-phone` with `action=send` or `action=verify`
pub async fn verify_phone_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<VerifyPhoneForm>,
) -> Response {
    let phone = form.phone.trim().to_string();
    let page = PageContext::new(&state.app_name, &headers, None);

    let outcome = match form.action {
        PhoneAction::Send => send_code(&state, &phone).await,
        PhoneAction::Verify => {
            let request = VerifyPhoneRequest {
                phone: phone.clone(),
                otp: form.otp.trim().to_string(),
            };
            match request.validate() {
                Ok(()) => state
                    .verification_service
                    .verify_phone(&request.phone, &request.otp)
                    .await
                    .map(PhoneOutcome::Verified),
                Err(errors) => Err(errors.into()),
            }
        }
    };

    match outcome {
        Ok(PhoneOutcome::CodeSent(expires_in)) => render(VerifyPhoneTemplate {
            page: page.with_toast(Toast::success(format!(
                "A verification code has been sent. It expires in {} minutes.",
                expires_in / 60
            ))),
            phone,
            code_sent: true,
        }),
        Ok(PhoneOutcome::Verified(Verification::Verified)) => redirect_with(
            "/dashboard",
            Toast::success("Your phone number has been verified."),
            state.secure_cookies,
        ),
        Ok(PhoneOutcome::Verified(Verification::AlreadyVerified)) => redirect_with(
            "/dashboard",
            Toast::info("Your phone number is already verified."),
            state.secure_cookies,
        ),
        Err(err) => (
            err.status(),
            render(VerifyPhoneTemplate {
                page: page.with_toast(Toast::error(error_message(&err))),
                phone,
                code_sent: form.action == PhoneAction::Verify,
            }),
        )
            .into_response(),
    }
}

enum PhoneOutcome {
    CodeSent(i64),
    Verified(Verification),
}

async fn send_code(state: &AppState, phone: &str) -> Result<PhoneOutcome, AppError> {
    let request = SendOtpRequest {
        phone: phone.to_string(),
    };
    request.validate()?;
    let expires_in = state.verification_service.send_otp(&request.phone).await?;
    Ok(PhoneOutcome::CodeSent(expires_in))
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
struct ForgotPasswordTemplate {
    page: PageContext,
    email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// `GET /forgot-password`
pub async fn forgot_password_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    render(ForgotPasswordTemplate {
        page: PageContext::new(&state.app_name, &headers, None),
        email: String::new(),
    })
}

/// `POST /forgot-password` - answers the same way whether or not the
/// account exists.
pub async fn forgot_password_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let request = ForgotPasswordRequest {
        email: form.email.trim().to_lowercase(),
    };

    let result = match request.validate() {
        Ok(()) => state.verification_service.forgot_password(&request.email).await,
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(()) => redirect_with(
            "/login",
            Toast::info("If an account exists for this email, a password reset link has been sent."),
            state.secure_cookies,
        ),
        Err(err) => (
            err.status(),
            render(ForgotPasswordTemplate {
                page: PageContext::new(&state.app_name, &headers, None)
                    .with_toast(Toast::error(error_message(&err))),
                email: request.email,
            }),
        )
            .into_response(),
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
struct ResetPasswordTemplate {
    page: PageContext,
    email: String,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetQuery {
    pub token: String,
    pub email: String,
}

/// Landing page for the link in the password reset email.
///
/// # Endpoint
///
/// `GET /reset-password?token=...&email=...`
pub async fn reset_password_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ResetQuery>,
) -> Response {
    render(ResetPasswordTemplate {
        page: PageContext::new(&state.app_name, &headers, None),
        email: query.email,
        token: query.token,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

/// `POST /reset-password`
pub async fn reset_password_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    client: Client,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let request = ResetPasswordRequest {
        email: form.email.trim().to_lowercase(),
        token: form.token.trim().to_string(),
        password: form.password,
        password_confirmation: form.password_confirmation,
    };

    let result = match request.validate() {
        Ok(()) => {
            state
                .verification_service
                .reset_password(
                    &request.email,
                    &request.token,
                    request.password.clone(),
                    &client.info,
                )
                .await
        }
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(()) => redirect_with(
            "/login",
            Toast::success("Password has been reset successfully. You can now log in."),
            state.secure_cookies,
        ),
        Err(err) => (
            err.status(),
            render(ResetPasswordTemplate {
                page: PageContext::new(&state.app_name, &headers, None)
                    .with_toast(Toast::error(error_message(&err))),
                email: request.email,
                token: request.token,
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_phone_action_defaults_to_send() {
        let uri: Uri = "/verify-phone?phone=%2B254700000001".parse().unwrap();
        let Query(form): Query<VerifyPhoneForm> = Query::try_from_uri(&uri).unwrap();
        assert_eq!(form.action, PhoneAction::Send);
        assert_eq!(form.phone, "+254700000001");

        let uri: Uri = "/verify-phone?action=verify&otp=123456".parse().unwrap();
        let Query(form): Query<VerifyPhoneForm> = Query::try_from_uri(&uri).unwrap();
        assert_eq!(form.action, PhoneAction::Verify);
        assert_eq!(form.otp, "123456");
    }

    #[test]
    fn test_reset_query_tolerates_missing_fields() {
        let uri: Uri = "/reset-password?token=abc".parse().unwrap();
        let Query(query): Query<ResetQuery> = Query::try_from_uri(&uri).unwrap();
        assert_eq!(query.token, "abc");
        assert!(query.email.is_empty());
    }
}
