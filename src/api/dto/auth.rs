//! DTOs for authentication and account verification endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::application::services::{AuthSession, CompanyInput, RegisterInput, UserProfile};
use crate::domain::entities::{User, UserRole};
use crate::error::{AppError, into_result, push_field_error};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "The password must be at least 6 characters."))]
    pub password: String,
}

fn self_service_role(role: &str) -> Result<(), ValidationError> {
    match role.parse::<UserRole>() {
        Ok(UserRole::JobSeeker | UserRole::Employer) => Ok(()),
        _ => Err(ValidationError::new("in").with_message("The selected role is invalid.".into())),
    }
}

/// Sign-up form. Employers also describe their company.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "The first name field is required."))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255, message = "The last name field is required."))]
    pub last_name: String,

    #[validate(
        email(message = "The email must be a valid email address."),
        length(max = 255)
    )]
    pub email: String,

    #[validate(length(min = 1, max = 20))]
    pub phone: Option<String>,

    #[validate(
        length(min = 8, message = "The password must be at least 8 characters."),
        must_match(
            other = "password_confirmation",
            message = "The password confirmation does not match."
        )
    )]
    pub password: String,

    pub password_confirmation: String,

    #[validate(custom(function = "self_service_role"))]
    pub role: String,

    #[validate(length(max = 255))]
    pub company_name: Option<String>,

    #[validate(url(message = "The company website must be a valid URL."))]
    pub company_website: Option<String>,

    #[validate(length(max = 5000))]
    pub company_description: Option<String>,

    pub industry_id: Option<i64>,
}

impl RegisterRequest {
    /// Cross-field rules, then conversion into the service input.
    pub fn into_input(self) -> Result<RegisterInput, AppError> {
        let role: UserRole = self
            .role
            .parse()
            .map_err(|_| AppError::invalid_field("role", "The selected role is invalid."))?;

        let company_name = self
            .company_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let mut errors = ValidationErrors::new();
        if role == UserRole::Employer && company_name.is_none() {
            push_field_error(
                &mut errors,
                "company_name",
                "required_if",
                "The company name field is required when role is employer.",
            );
        }
        into_result(errors)?;

        let company = match (role, company_name) {
            (UserRole::Employer, Some(name)) => Some(CompanyInput {
                name,
                website: self.company_website,
                description: self.company_description,
                industry_id: self.industry_id,
            }),
            _ => None,
        };

        Ok(RegisterInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            password: self.password,
            role,
            company,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "The token field is required."))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(length(min = 1, max = 20, message = "The phone field is required."))]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPhoneRequest {
    #[validate(length(min = 1, max = 20, message = "The phone field is required."))]
    pub phone: String,

    #[validate(length(equal = 6, message = "The otp must be 6 characters."))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, message = "The token field is required."))]
    pub token: String,

    #[validate(
        length(min = 8, message = "The password must be at least 8 characters."),
        must_match(
            other = "password_confirmation",
            message = "The password confirmation does not match."
        )
    )]
    pub password: String,

    pub password_confirmation: String,
}

/// Login and refresh response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

impl From<AuthSession> for TokenResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            success: true,
            access_token: session.token.token,
            token_type: "bearer",
            expires_in: session.token.expires_in,
            user: session.user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: User,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<AuthSession> for RegisterResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            success: true,
            message: "Registration successful. Please verify your email address.",
            user: session.user,
            access_token: session.token.token,
            token_type: "bearer",
            expires_in: session.token.expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub success: bool,
    pub message: &'static str,
    pub expires_in: i64,
}
