//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! runtime-checked queries. Enumerated columns are bound and read as text.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts, lockout counters and verification state
//! - [`PgAuthLogRepository`] - Authentication audit trail
//! - [`PgPasswordResetRepository`] / [`PgRevokedTokenRepository`] - Credential bookkeeping
//! - [`PgCompanyRepository`] - Companies, memberships, industries and skills
//! - [`PgJobRepository`] - Job postings and search
//! - [`PgSavedJobRepository`] - Saved jobs
//! - [`PgApplicationRepository`] - Applications and status history
//! - [`PgSubscriptionRepository`] - HR packages and subscriptions
//! - [`PgNotificationLogRepository`] - Email and SMS delivery logs
//! - [`PgAnalyticsRepository`] - Job views and search logs

pub mod pg_analytics_repository;
pub mod pg_application_repository;
pub mod pg_auth_log_repository;
pub mod pg_company_repository;
pub mod pg_job_repository;
pub mod pg_notification_log_repository;
pub mod pg_password_reset_repository;
pub mod pg_revoked_token_repository;
pub mod pg_saved_job_repository;
pub mod pg_subscription_repository;
pub mod pg_user_repository;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_application_repository::PgApplicationRepository;
pub use pg_auth_log_repository::PgAuthLogRepository;
pub use pg_company_repository::PgCompanyRepository;
pub use pg_job_repository::PgJobRepository;
pub use pg_notification_log_repository::PgNotificationLogRepository;
pub use pg_password_reset_repository::PgPasswordResetRepository;
pub use pg_revoked_token_repository::PgRevokedTokenRepository;
pub use pg_saved_job_repository::PgSavedJobRepository;
pub use pg_subscription_repository::PgSubscriptionRepository;
pub use pg_user_repository::PgUserRepository;
