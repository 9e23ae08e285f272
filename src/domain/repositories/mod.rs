//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod analytics_repository;
pub mod application_repository;
pub mod auth_log_repository;
pub mod company_repository;
pub mod credential_repository;
pub mod job_repository;
pub mod notification_log_repository;
pub mod saved_job_repository;
pub mod subscription_repository;
pub mod user_repository;

pub use analytics_repository::{AnalyticsRepository, JobView, SearchRecord};
pub use application_repository::ApplicationRepository;
pub use auth_log_repository::AuthLogRepository;
pub use company_repository::CompanyRepository;
pub use credential_repository::{
    PasswordResetRepository, PasswordResetToken, RevokedTokenRepository,
};
pub use job_repository::JobRepository;
pub use notification_log_repository::NotificationLogRepository;
pub use saved_job_repository::SavedJobRepository;
pub use subscription_repository::SubscriptionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
#[cfg(test)]
pub use auth_log_repository::MockAuthLogRepository;
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
#[cfg(test)]
pub use credential_repository::{MockPasswordResetRepository, MockRevokedTokenRepository};
#[cfg(test)]
pub use job_repository::MockJobRepository;
#[cfg(test)]
pub use notification_log_repository::MockNotificationLogRepository;
#[cfg(test)]
pub use saved_job_repository::MockSavedJobRepository;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
