//! Job applications for seekers and employers.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::email_service::{EmailService, Recipient};
use super::membership::{Permission, require_membership};
use crate::domain::entities::{
    ApplicationFilter, ApplicationStatus, JobApplication, JobSeeker, NewApplication,
    PageRequest, Paginated, StatusChange, StatusHistoryEntry, User,
};
use crate::domain::repositories::{
    ApplicationRepository, CompanyRepository, JobRepository, NotificationLogRepository,
    UserRepository,
};
use crate::error::AppError;

/// An application with its status history.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: JobApplication,
    pub history: Vec<StatusHistoryEntry>,
}

/// Employer decision on an application.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub note: Option<String>,
}

/// Loads the job seeker profile of `user`.
pub async fn require_seeker<U: UserRepository + ?Sized>(
    users: &U,
    user: &User,
) -> Result<JobSeeker, AppError> {
    users
        .find_job_seeker(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Job seeker profile not found", json!({})))
}

pub struct ApplicationService<U, J, A, C, N>
where
    U: UserRepository,
    J: JobRepository,
    A: ApplicationRepository,
    C: CompanyRepository,
    N: NotificationLogRepository,
{
    users: Arc<U>,
    jobs: Arc<J>,
    applications: Arc<A>,
    companies: Arc<C>,
    email: Arc<EmailService<N>>,
}

impl<U, J, A, C, N> ApplicationService<U, J, A, C, N>
where
    U: UserRepository,
    J: JobRepository,
    A: ApplicationRepository,
    C: CompanyRepository,
    N: NotificationLogRepository,
{
    pub fn new(
        users: Arc<U>,
        jobs: Arc<J>,
        applications: Arc<A>,
        companies: Arc<C>,
        email: Arc<EmailService<N>>,
    ) -> Self {
        Self {
            users,
            jobs,
            applications,
            companies,
            email,
        }
    }

    /// Submits an application to an open posting.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] without a seeker profile or for unknown jobs
    /// - [`AppError::Validation`] when the job no longer accepts applications
    /// - [`AppError::Conflict`] when the seeker already applied
    pub async fn apply(
        &self,
        user: &User,
        job_id: i64,
        cover_letter: Option<String>,
        expected_salary: Option<f64>,
    ) -> Result<JobApplication, AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;

        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::not_found("Job not found", json!({})))?;

        if !job.accepts_applications(Utc::now()) {
            return Err(AppError::invalid_field(
                "job_posting_id",
                "This job is no longer accepting applications.",
            ));
        }

        let application = self
            .applications
            .create(NewApplication {
                uuid: Uuid::new_v4(),
                job_posting_id: job.id,
                job_seeker_id: seeker.id,
                cover_letter,
                expected_salary,
            })
            .await?;

        info!(
            application_id = application.id,
            job_id = job.id,
            "Application submitted"
        );
        Ok(application)
    }

    pub async fn my_applications(
        &self,
        user: &User,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Paginated<JobApplication>, AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;
        let filter = ApplicationFilter {
            job_posting_id: None,
            status,
        };

        let total = self
            .applications
            .count_for_seeker(seeker.id, filter.clone())
            .await?;
        let items = self
            .applications
            .list_for_seeker(seeker.id, filter, page.offset(), page.limit())
            .await?;

        Ok(Paginated::new(items, page, total))
    }

    pub async fn show(&self, user: &User, id: i64) -> Result<ApplicationDetail, AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;
        let application = self.owned_by_seeker(seeker.id, id).await?;
        let history = self.applications.history(application.id).await?;

        Ok(ApplicationDetail {
            application,
            history,
        })
    }

    pub async fn withdraw(&self, user: &User, id: i64) -> Result<JobApplication, AppError> {
        let seeker = require_seeker(self.users.as_ref(), user).await?;
        let application = self.owned_by_seeker(seeker.id, id).await?;

        if !application.status.can_withdraw() {
            return Err(AppError::conflict(
                format!(
                    "Application cannot be withdrawn while {}",
                    application.status
                ),
                json!({ "status": application.status }),
            ));
        }

        let updated = self
            .applications
            .change_status(StatusChange {
                application_id: application.id,
                from: application.status,
                to: ApplicationStatus::Withdrawn,
                changed_by: user.id,
                rejection_reason: None,
                note: None,
            })
            .await?;

        info!(application_id = id, "Application withdrawn");
        Ok(updated)
    }

    pub async fn employer_applications(
        &self,
        user: &User,
        job_posting_id: Option<i64>,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Paginated<JobApplication>, AppError> {
        let membership = require_membership(
            self.companies.as_ref(),
            user.id,
            Some(Permission::ManageApplications),
        )
        .await?;
        let filter = ApplicationFilter {
            job_posting_id,
            status,
        };

        let total = self
            .applications
            .count_for_company(membership.company_id, filter.clone())
            .await?;
        let items = self
            .applications
            .list_for_company(membership.company_id, filter, page.offset(), page.limit())
            .await?;

        Ok(Paginated::new(items, page, total))
    }

    /// Moves an application along the review pipeline and emails the
    /// applicant about it.
    pub async fn update_status(
        &self,
        user: &User,
        id: i64,
        update: StatusUpdate,
    ) -> Result<JobApplication, AppError> {
        let membership = require_membership(
            self.companies.as_ref(),
            user.id,
            Some(Permission::ManageApplications),
        )
        .await?;

        let application = self
            .applications
            .find_by_id(id)
            .await?
            .filter(|a| a.company_id == membership.company_id)
            .ok_or_else(application_not_found)?;

        if !application.status.can_transition_to(update.status) {
            return Err(AppError::conflict(
                format!(
                    "Cannot change application status from {} to {}",
                    application.status, update.status
                ),
                json!({ "from": application.status, "to": update.status }),
            ));
        }

        let updated = self
            .applications
            .change_status(StatusChange {
                application_id: application.id,
                from: application.status,
                to: update.status,
                changed_by: user.id,
                rejection_reason: update.rejection_reason,
                note: update.note,
            })
            .await?;

        info!(
            application_id = id,
            from = %application.status,
            to = %updated.status,
            "Application status changed"
        );
        self.notify_applicant(&updated).await;

        Ok(updated)
    }

    async fn owned_by_seeker(&self, seeker_id: i64, id: i64) -> Result<JobApplication, AppError> {
        self.applications
            .find_by_id(id)
            .await?
            .filter(|a| a.job_seeker_id == seeker_id)
            .ok_or_else(application_not_found)
    }

    async fn notify_applicant(&self, application: &JobApplication) {
        let recipient = Recipient {
            user_id: None,
            email: application.applicant_email.clone(),
            name: application.applicant_name.clone(),
        };
        let message = format!(
            "Your application for {} at {} is now {}.",
            application.job_title, application.company_name, application.status
        );

        if !self
            .email
            .send_notification_email(recipient, "Application status update", &message, None)
            .await
        {
            warn!(
                application_id = application.id,
                "Status notification was not delivered"
            );
        }
    }
}

fn application_not_found() -> AppError {
    AppError::not_found("Application not found", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::JobPosting;
    use crate::domain::entities::company::fixtures::owner_membership;
    use crate::domain::entities::job_application::fixtures::application;
    use crate::domain::entities::job_posting::fixtures::job;
    use crate::domain::entities::user::fixtures::user;
    use crate::domain::entities::{JobStatus, JobSeeker};
    use crate::domain::repositories::{
        MockApplicationRepository, MockCompanyRepository, MockJobRepository,
        MockNotificationLogRepository, MockUserRepository,
    };
    use crate::infrastructure::notify::MockMailer;

    type TestService = ApplicationService<
        MockUserRepository,
        MockJobRepository,
        MockApplicationRepository,
        MockCompanyRepository,
        MockNotificationLogRepository,
    >;

    fn seeker(id: i64, user_id: i64) -> JobSeeker {
        let now = Utc::now();
        JobSeeker {
            id,
            user_id,
            bio: None,
            current_job_title: None,
            years_of_experience: None,
            current_location: None,
            resume_url: None,
            is_available: true,
            profile_completion_percentage: 20,
            created_at: now,
            updated_at: now,
        }
    }

    fn users_with_seeker() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_job_seeker()
            .returning(|user_id| Ok(Some(seeker(50, user_id))));
        users
    }

    fn service(
        users: MockUserRepository,
        jobs: MockJobRepository,
        applications: MockApplicationRepository,
        mailer: MockMailer,
    ) -> TestService {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(1)]));

        let mut logs = MockNotificationLogRepository::new();
        logs.expect_create_email_log().returning(|_| Ok(1));
        logs.expect_mark_email_sent().returning(|_| Ok(()));
        logs.expect_mark_email_failed().returning(|_, _| Ok(()));

        let email = EmailService::new(
            Arc::new(logs),
            Arc::new(mailer),
            "HR Talent".to_string(),
            "http://localhost:3000".to_string(),
            60,
        );

        ApplicationService::new(
            Arc::new(users),
            Arc::new(jobs),
            Arc::new(applications),
            Arc::new(companies),
            Arc::new(email),
        )
    }

    #[tokio::test]
    async fn test_apply_to_open_job() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| Ok(Some(job(id, 1, 9))));

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_create()
            .withf(|new_app| new_app.job_posting_id == 3 && new_app.job_seeker_id == 50)
            .times(1)
            .returning(|new_app| {
                Ok(application(1, new_app.job_posting_id, new_app.job_seeker_id))
            });

        let created = service(users_with_seeker(), jobs, applications, MockMailer::new())
            .apply(&user(4), 3, Some("Hello".to_string()), None)
            .await
            .unwrap();
        assert_eq!(created.status, ApplicationStatus::Submitted);
    }

    #[tokio::test]
    async fn test_apply_to_closed_job_is_rejected() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| {
            Ok(Some(JobPosting {
                status: JobStatus::Closed,
                ..job(id, 1, 9)
            }))
        });

        let mut applications = MockApplicationRepository::new();
        applications.expect_create().never();

        let err = service(users_with_seeker(), jobs, applications, MockMailer::new())
            .apply(&user(4), 3, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_apply_without_profile() {
        let mut users = MockUserRepository::new();
        users.expect_find_job_seeker().returning(|_| Ok(None));

        let err = service(
            users,
            MockJobRepository::new(),
            MockApplicationRepository::new(),
            MockMailer::new(),
        )
        .apply(&user(4), 3, None, None)
        .await
        .unwrap_err();
        assert_eq!(err.info().message, "Job seeker profile not found");
    }

    #[tokio::test]
    async fn test_withdraw_terminal_application_conflicts() {
        let mut applications = MockApplicationRepository::new();
        applications.expect_find_by_id().returning(|id| {
            Ok(Some(JobApplication {
                status: ApplicationStatus::Accepted,
                ..application(id, 3, 50)
            }))
        });
        applications.expect_change_status().never();

        let err = service(
            users_with_seeker(),
            MockJobRepository::new(),
            applications,
            MockMailer::new(),
        )
        .withdraw(&user(4), 1)
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_other_seekers_application_is_hidden() {
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(|id| Ok(Some(application(id, 3, 777))));

        let err = service(
            users_with_seeker(),
            MockJobRepository::new(),
            applications,
            MockMailer::new(),
        )
        .show(&user(4), 1)
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_status_follows_transition_table() {
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(|id| Ok(Some(application(id, 3, 50))));
        applications
            .expect_change_status()
            .withf(|change| {
                change.from == ApplicationStatus::Submitted
                    && change.to == ApplicationStatus::Reviewing
                    && change.changed_by == 2
            })
            .times(1)
            .returning(|change| {
                Ok(JobApplication {
                    status: change.to,
                    ..application(change.application_id, 3, 50)
                })
            });

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| email.text_body.contains("is now reviewing"))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(MockUserRepository::new(), MockJobRepository::new(), applications, mailer);
        let employer = user(2);

        let updated = svc
            .update_status(
                &employer,
                1,
                StatusUpdate {
                    status: ApplicationStatus::Reviewing,
                    rejection_reason: None,
                    note: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Reviewing);

        let err = svc
            .update_status(
                &employer,
                1,
                StatusUpdate {
                    status: ApplicationStatus::Offered,
                    rejection_reason: None,
                    note: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }
}
