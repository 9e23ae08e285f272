//! Application layer services implementing business logic.
//!
//! Services orchestrate repository calls, validation and business rules and
//! give HTTP handlers a small API to call.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Login, registration, lockout and JWT sessions
//! - [`services::verification_service::VerificationService`] - Email, phone and password reset flows
//! - [`services::job_service::JobService`] - Job search and employer job management
//! - [`services::saved_job_service::SavedJobService`] - Saved jobs
//! - [`services::application_service::ApplicationService`] - Job applications
//! - [`services::company_service::CompanyService`] - Company directory and profile
//! - [`services::subscription_service::SubscriptionService`] - HR packages and billing
//! - [`services::email_service::EmailService`] / [`services::sms_service::SmsService`] - Notifications

pub mod services;
