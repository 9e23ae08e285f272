//! Business logic services for the application layer.

pub mod application_service;
pub mod auth_service;
pub mod company_service;
pub mod email_service;
pub mod job_service;
pub mod membership;
pub mod saved_job_service;
pub mod sms_service;
pub mod subscription_service;
pub mod token_service;
pub mod verification_service;

pub use application_service::{ApplicationDetail, ApplicationService, StatusUpdate};
pub use auth_service::{AuthService, AuthSession, CompanyInput, RegisterInput, UserProfile};
pub use company_service::CompanyService;
pub use email_service::{EmailService, Recipient};
pub use job_service::{FilterOptions, JobDraft, JobService, Visitor};
pub use saved_job_service::SavedJobService;
pub use sms_service::SmsService;
pub use subscription_service::SubscriptionService;
pub use token_service::{Claims, IssuedToken, TokenError, TokenService};
pub use verification_service::{Verification, VerificationService};
