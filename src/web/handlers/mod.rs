//! HTML page handlers.

mod auth;
mod dashboard;
mod jobs;
mod verification;

use axum::response::Redirect;

pub use auth::{login_page, login_submit, logout, register_page, register_submit};
pub use dashboard::dashboard_handler;
pub use jobs::jobs_handler;
pub use verification::{
    forgot_password_page, forgot_password_submit, reset_password_page, reset_password_submit,
    verify_email_page, verify_phone_page, verify_phone_submit,
};

/// `GET /` sends visitors to the job search.
pub async fn home_handler() -> Redirect {
    Redirect::to("/jobs")
}
