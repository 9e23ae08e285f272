//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::Claims;
use crate::domain::entities::{User, UserRole};
use crate::{error::AppError, state::AppState};

/// The authenticated user, inserted into request extensions by [`layer`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub claims: Claims,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(token_absent)
    }
}

fn token_absent() -> AppError {
    AppError::unauthorized(
        "Authorization token not found",
        json!({"reason": "Authorization header is missing or invalid"}),
    )
    .with_code("TOKEN_ABSENT")
}

/// Authenticates requests using JWT Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify signature and expiry
/// 3. Reject revoked token ids
/// 4. Load the user and check the account is active
/// 5. Attach [`AuthUser`] and continue to next middleware/handler
///
/// # Errors
///
/// - `401 TOKEN_ABSENT` if the header is missing or malformed
/// - `401 TOKEN_EXPIRED` / `TOKEN_INVALID` for bad or revoked tokens
/// - `404 USER_NOT_FOUND` if the account no longer exists
/// - `403 ACCOUNT_INACTIVE` for deactivated accounts
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| token_absent())?;

    let (user, claims) = st.auth_service.authenticate(&token).await?;

    parts.extensions.insert(AuthUser { user, claims });
    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Restricts a route group to job seekers. Must run after [`layer`].
pub async fn require_job_seeker(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(req, next, |role| role == UserRole::JobSeeker, "job seekers").await
}

/// Restricts a route group to employers. Must run after [`layer`].
pub async fn require_employer(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(req, next, |role| role == UserRole::Employer, "employers").await
}

async fn require_role(
    req: Request,
    next: Next,
    allowed: impl Fn(UserRole) -> bool,
    audience: &str,
) -> Result<Response, AppError> {
    let role = req
        .extensions()
        .get::<AuthUser>()
        .map(|auth| auth.user.role)
        .ok_or_else(token_absent)?;

    if !allowed(role) {
        return Err(AppError::forbidden(
            format!("This action is only available to {audience}"),
            json!({ "role": role }),
        ));
    }

    Ok(next.run(req).await)
}
