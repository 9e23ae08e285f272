//! API route configuration.
//!
//! Paths are relative to `/api`. Groups differ in who may call them;
//! [`crate::routes::app_router`] attaches authentication, role guards and
//! rate limits per group.

use crate::api::handlers::{
    application_show_handler, apply_handler, cancel_subscription_handler, company_jobs_handler,
    company_list_handler, company_show_handler, create_job_handler, current_subscription_handler,
    delete_job_handler, employer_applications_handler, employer_job_list_handler,
    employer_job_show_handler, forgot_password_handler, job_list_handler, job_show_handler,
    login_handler, logout_handler, me_handler, my_applications_handler, my_company_handler,
    package_list_handler, pause_job_handler, publish_job_handler, refresh_handler,
    register_handler, reset_password_handler, save_job_handler, saved_jobs_handler,
    send_otp_handler, similar_jobs_handler, sms_delivery_receipt_handler, subscribe_handler,
    unsave_job_handler, update_company_handler, update_job_handler, update_status_handler,
    usage_handler, verify_email_handler, verify_phone_handler, withdraw_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Account endpoints open to anonymous callers. Rate limited strictly.
///
/// # Endpoints
///
/// - `POST /auth/login`
/// - `POST /auth/register`
/// - `POST /auth/verify-email`
/// - `POST /auth/send-otp`
/// - `POST /auth/verify-phone`
/// - `POST /auth/forgot-password`
/// - `POST /auth/reset-password`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/verify-email", post(verify_email_handler))
        .route("/auth/send-otp", post(send_otp_handler))
        .route("/auth/verify-phone", post(verify_phone_handler))
        .route("/auth/forgot-password", post(forgot_password_handler))
        .route("/auth/reset-password", post(reset_password_handler))
}

/// Public read endpoints and gateway callbacks.
///
/// # Endpoints
///
/// - `GET  /jobs`, `/jobs/{id}`, `/jobs/{id}/similar`
/// - `GET  /companies`, `/companies/{company}`, `/companies/{company}/jobs`
/// - `GET  /hr-packages`
/// - `POST /webhooks/sms/delivery-receipt`
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(job_list_handler))
        .route("/jobs/{id}", get(job_show_handler))
        .route("/jobs/{id}/similar", get(similar_jobs_handler))
        .route("/companies", get(company_list_handler))
        .route("/companies/{company}", get(company_show_handler))
        .route("/companies/{company}/jobs", get(company_jobs_handler))
        .route("/hr-packages", get(package_list_handler))
        .route(
            "/webhooks/sms/delivery-receipt",
            post(sms_delivery_receipt_handler),
        )
}

/// Session endpoints for any signed-in user.
///
/// # Endpoints
///
/// - `POST /auth/logout`
/// - `POST /auth/refresh`
/// - `GET  /auth/me`
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route("/auth/refresh", post(refresh_handler))
        .route("/auth/me", get(me_handler))
}

/// Job seeker endpoints.
///
/// # Endpoints
///
/// - `GET  /applications` / `POST /applications`
/// - `GET  /applications/{id}`
/// - `POST /applications/{id}/withdraw`
/// - `GET  /saved-jobs`
/// - `POST /saved-jobs/{job}/save`
/// - `DELETE /saved-jobs/{job}/unsave`
pub fn job_seeker_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(my_applications_handler).post(apply_handler),
        )
        .route("/applications/{id}", get(application_show_handler))
        .route("/applications/{id}/withdraw", post(withdraw_handler))
        .route("/saved-jobs", get(saved_jobs_handler))
        .route("/saved-jobs/{job}/save", post(save_job_handler))
        .route("/saved-jobs/{job}/unsave", delete(unsave_job_handler))
}

/// Employer endpoints.
///
/// # Endpoints
///
/// - `GET  /employer/jobs` / `POST /employer/jobs`
/// - `GET  /employer/jobs/{job}` / `PUT` / `DELETE`
/// - `POST /employer/jobs/{job}/publish`, `/employer/jobs/{job}/pause`
/// - `GET  /employer/applications`
/// - `PUT  /employer/applications/{id}/status`
/// - `GET  /employer/company` / `PUT`
/// - `GET  /employer/subscription`
/// - `POST /employer/subscription/subscribe`, `/employer/subscription/cancel`
/// - `GET  /employer/subscription/usage`
pub fn employer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/employer/jobs",
            get(employer_job_list_handler).post(create_job_handler),
        )
        .route(
            "/employer/jobs/{job}",
            get(employer_job_show_handler)
                .put(update_job_handler)
                .delete(delete_job_handler),
        )
        .route("/employer/jobs/{job}/publish", post(publish_job_handler))
        .route("/employer/jobs/{job}/pause", post(pause_job_handler))
        .route("/employer/applications", get(employer_applications_handler))
        .route(
            "/employer/applications/{id}/status",
            put(update_status_handler),
        )
        .route(
            "/employer/company",
            get(my_company_handler).put(update_company_handler),
        )
        .route(
            "/employer/subscription",
            get(current_subscription_handler),
        )
        .route("/employer/subscription/subscribe", post(subscribe_handler))
        .route(
            "/employer/subscription/cancel",
            post(cancel_subscription_handler),
        )
        .route("/employer/subscription/usage", get(usage_handler))
}
