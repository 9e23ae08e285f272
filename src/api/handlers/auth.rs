//! Handlers for login, registration and session endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::auth::{
    LoginRequest, LogoutResponse, MeResponse, RegisterRequest, RegisterResponse, TokenResponse,
};
use crate::api::extract::{Client, ValidJson};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Signs a user in.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Request Body
///
/// ```json
/// { "email": "amina@example.com", "password": "secret123" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "access_token": "eyJ...",
///   "token_type": "bearer",
///   "expires_in": 3600,
///   "user": { "id": 1, "email": "amina@example.com", ... }
/// }
/// ```
///
/// # Errors
///
/// - **401**: Unknown email, wrong password or deactivated account. A wrong
///   password reports `remaining_attempts`; the attempt that locks the
///   account reports the lock instead.
/// - **422**: Missing or malformed fields
/// - **423**: Account locked (`ACCOUNT_LOCKED` with the remaining time)
pub async fn login_handler(
    State(state): State<AppState>,
    client: Client,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();

    let session = state
        .auth_service
        .login(&email, &payload.password, &client.info)
        .await?;

    Ok(Json(session.into()))
}

/// Creates a job seeker or employer account and signs it in.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// Employers must send `company_name`; the company is created together with
/// the account and the user becomes its owner. A verification email is sent
/// after the account is stored.
///
/// # Response Codes
///
/// - **201 Created**: Account created, token issued
/// - **422**: Field errors (taken email or phone, unknown industry, ...)
/// - **500**: The account could not be stored
pub async fn register_handler(
    State(state): State<AppState>,
    client: Client,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let input = payload.into_input()?;
    let session = state.auth_service.register(input, &client.info).await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// `GET /api/auth/me` - the current user with profile and companies.
pub async fn me_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = state.auth_service.me(auth.user).await?;

    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}

/// Revokes the presented token.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// # Response
///
/// ```json
/// { "message": "Successfully logged out" }
/// ```
pub async fn logout_handler(
    State(state): State<AppState>,
    client: Client,
    auth: AuthUser,
) -> Result<Json<LogoutResponse>, AppError> {
    state
        .auth_service
        .logout(&auth.user, &auth.claims, &client.info)
        .await?;

    Ok(Json(LogoutResponse {
        message: "Successfully logged out",
    }))
}

/// `POST /api/auth/refresh` - revokes the presented token and issues a new
/// one. The response has the same shape as login.
pub async fn refresh_handler(
    State(state): State<AppState>,
    client: Client,
    auth: AuthUser,
) -> Result<Json<TokenResponse>, AppError> {
    let session = state
        .auth_service
        .refresh(auth.user, &auth.claims, &client.info)
        .await?;

    Ok(Json(session.into()))
}
