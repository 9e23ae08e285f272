//! Core business entities.
//!
//! Entities map one-to-one onto query results (`sqlx::FromRow`) and are
//! serialized directly into API responses. Status columns are typed through
//! the enums in [`enums`].

pub mod activity;
pub mod company;
pub mod enums;
pub mod job_application;
pub mod job_posting;
pub mod page;
pub mod subscription;
pub mod user;

pub use activity::{
    AuthAction, ClientInfo, EmailLog, NewAuthLog, NewEmailLog, NewSmsLog, SmsLog,
};
pub use company::{Company, CompanyMembership, CompanyPatch, Industry, Skill};
pub use enums::{
    ApplicationStatus, BillingPeriod, CompanyRole, EmailStatus, ExperienceLevel, JobStatus,
    JobType, PackageTier, SalaryPeriod, SmsStatus, SubscriptionStatus, UnknownVariant, UserRole,
};
pub use job_application::{
    ApplicationFilter, JobApplication, NewApplication, StatusChange, StatusHistoryEntry,
};
pub use job_posting::{JobFilter, JobPatch, JobPosting, NewJobPosting, SavedJob};
pub use page::{PageMeta, PageRequest, Paginated};
pub use subscription::{HrPackage, NewSubscription, Subscription, SubscriptionUsage};
pub use user::{
    FailedLogin, JobSeeker, LockRemaining, LockState, NewCompanyProfile, NewUser, User,
};
