//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod applications;
pub mod auth;
pub mod companies;
pub mod employer_jobs;
pub mod fallback;
pub mod health;
pub mod jobs;
pub mod subscriptions;
pub mod verification;
pub mod webhooks;

pub use applications::{
    application_show_handler, apply_handler, employer_applications_handler,
    my_applications_handler, save_job_handler, saved_jobs_handler, unsave_job_handler,
    update_status_handler, withdraw_handler,
};
pub use auth::{login_handler, logout_handler, me_handler, refresh_handler, register_handler};
pub use companies::{
    company_jobs_handler, company_list_handler, company_show_handler, my_company_handler,
    update_company_handler,
};
pub use employer_jobs::{
    create_job_handler, delete_job_handler, employer_job_list_handler, employer_job_show_handler,
    pause_job_handler, publish_job_handler, update_job_handler,
};
pub use fallback::not_found_handler;
pub use health::health_handler;
pub use jobs::{job_list_handler, job_show_handler, similar_jobs_handler};
pub use subscriptions::{
    cancel_subscription_handler, current_subscription_handler, package_list_handler,
    subscribe_handler, usage_handler,
};
pub use verification::{
    forgot_password_handler, reset_password_handler, send_otp_handler, verify_email_handler,
    verify_phone_handler,
};
pub use webhooks::sms_delivery_receipt_handler;
