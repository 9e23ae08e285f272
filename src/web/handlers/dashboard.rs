//! Signed-in home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::HeaderMap, response::Response};

use crate::api::middleware::AuthUser;
use crate::application::services::UserProfile;
use crate::domain::entities::{JobApplication, JobPosting, PageRequest, UserRole};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::cookies::Toast;
use crate::web::page::{PageContext, error_message, render};

/// Template for the dashboard.
///
/// Job seekers see their latest applications; employers see their
/// company's postings.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    page: PageContext,
    profile: UserProfile,
    is_employer: bool,
    email_verified: bool,
    pending_phone: Option<String>,
    applications: Vec<JobApplication>,
    jobs: Vec<JobPosting>,
}

/// Renders the dashboard.
///
/// # Endpoint
///
/// `GET /dashboard`
///
/// # Authentication
///
/// Requires the session cookie; see [`crate::web::middleware::web_auth`].
pub async fn dashboard_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let mut page = PageContext::new(&state.app_name, &headers, Some(&auth.user));
    let recent = PageRequest::new(Some(1), Some(10));

    let mut applications = Vec::new();
    let mut jobs = Vec::new();
    let listing = match auth.user.role {
        UserRole::JobSeeker => state
            .application_service
            .my_applications(&auth.user, None, recent)
            .await
            .map(|p| applications = p.items),
        UserRole::Employer => state
            .job_service
            .employer_jobs(&auth.user, None, recent)
            .await
            .map(|p| jobs = p.items),
        UserRole::Admin | UserRole::SuperAdmin => Ok(()),
    };
    if let Err(err) = listing {
        tracing::warn!(error = %err, user_id = auth.user.id, "Dashboard listing unavailable");
        page = page.with_toast(Toast::warning(error_message(&err)));
    }

    let profile = state.auth_service.me(auth.user).await?;
    let user = &profile.user;

    Ok(render(DashboardTemplate {
        page,
        is_employer: user.role == UserRole::Employer,
        email_verified: user.email_verified_at.is_some(),
        pending_phone: user.phone.clone().filter(|_| user.phone_verified_at.is_none()),
        profile,
        applications,
        jobs,
    }))
}
