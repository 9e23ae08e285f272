//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    dashboard_handler, forgot_password_page, forgot_password_submit, home_handler, jobs_handler,
    login_page, login_submit, logout, register_page, register_submit, reset_password_page,
    reset_password_submit, verify_email_page, verify_phone_page, verify_phone_submit,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Protected pages requiring a session cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET /dashboard` - Profile and recent activity
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_handler))
}

/// Pages anyone may view.
///
/// # Endpoints
///
/// - `GET /` - Redirects to `/jobs`
/// - `GET /jobs` - Job search
/// - `GET /login`, `/register`, `/forgot-password`, `/reset-password`,
///   `/verify-email`, `/verify-phone`
/// - `GET /logout`
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/jobs", get(jobs_handler))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/logout", get(logout))
        .route("/verify-email", get(verify_email_page))
        .route("/verify-phone", get(verify_phone_page))
        .route("/forgot-password", get(forgot_password_page))
        .route("/reset-password", get(reset_password_page))
}

/// Form submissions that touch credentials. Rate limited strictly.
///
/// # Endpoints
///
/// - `POST /login`, `/register`, `/logout`, `/verify-phone`,
///   `/forgot-password`, `/reset-password`
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_submit))
        .route("/register", post(register_submit))
        .route("/logout", post(logout))
        .route("/verify-phone", post(verify_phone_submit))
        .route("/forgot-password", post(forgot_password_submit))
        .route("/reset-password", post(reset_password_submit))
}
