//! Job search, job detail and employer job management.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use super::membership::{Permission, require_membership};
use super::subscription_service::current_usage;
use crate::domain::analytics_event::{AnalyticsEvent, publish};
use crate::domain::entities::{
    ExperienceLevel, Industry, JobFilter, JobPatch, JobPosting, JobStatus, JobType,
    NewJobPosting, PageRequest, Paginated, SalaryPeriod, User,
};
use crate::domain::repositories::{
    CompanyRepository, JobRepository, JobView, SearchRecord, SubscriptionRepository,
};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, INDUSTRIES_KEY, get_json, job_key, set_json};
use crate::utils::slug::slugify;

pub const DEFAULT_SIMILAR_LIMIT: i64 = 5;
pub const MAX_SIMILAR_LIMIT: i64 = 20;

/// Request metadata recorded with views and searches.
#[derive(Debug, Clone, Default)]
pub struct Visitor {
    pub user_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Options offered by the search form.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub industries: Vec<Industry>,
    pub job_types: Vec<&'static str>,
    pub experience_levels: Vec<&'static str>,
}

/// A validated new posting, before company and slug are resolved.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub industry_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub is_remote: bool,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: String,
    pub salary_period: SalaryPeriod,
    pub salary_negotiable: bool,
    pub positions_available: i32,
    pub application_deadline: Option<NaiveDate>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_urgent: bool,
    pub skill_ids: Vec<i64>,
}

pub struct JobService<J, C, S>
where
    J: JobRepository,
    C: CompanyRepository,
    S: SubscriptionRepository,
{
    jobs: Arc<J>,
    companies: Arc<C>,
    subscriptions: Arc<S>,
    cache: Arc<dyn CacheService>,
    analytics: mpsc::Sender<AnalyticsEvent>,
    cache_ttl_seconds: u64,
}

impl<J, C, S> JobService<J, C, S>
where
    J: JobRepository,
    C: CompanyRepository,
    S: SubscriptionRepository,
{
    pub fn new(
        jobs: Arc<J>,
        companies: Arc<C>,
        subscriptions: Arc<S>,
        cache: Arc<dyn CacheService>,
        analytics: mpsc::Sender<AnalyticsEvent>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            jobs,
            companies,
            subscriptions,
            cache,
            analytics,
            cache_ttl_seconds,
        }
    }

    /// Open postings matching `filter`. Searches with a text term are
    /// recorded in the background.
    pub async fn search(
        &self,
        filter: JobFilter,
        page: PageRequest,
        visitor: Visitor,
    ) -> Result<Paginated<JobPosting>, AppError> {
        let total = self.jobs.count(&filter).await?;
        let jobs = self
            .jobs
            .search(&filter, page.offset(), page.limit())
            .await?;

        if let Some(query) = filter.search.as_deref().map(str::trim)
            && !query.is_empty()
        {
            publish(
                &self.analytics,
                AnalyticsEvent::JobSearched(SearchRecord {
                    user_id: visitor.user_id,
                    query: query.to_string(),
                    filters: serde_json::to_value(&filter).unwrap_or_default(),
                    results_count: total,
                    ip: visitor.ip,
                }),
            );
        }

        Ok(Paginated::new(jobs, page, total))
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        let industries = match get_json::<Vec<Industry>>(self.cache.as_ref(), INDUSTRIES_KEY).await
        {
            Some(cached) => cached,
            None => {
                let industries = self.companies.industries().await?;
                set_json(
                    self.cache.as_ref(),
                    INDUSTRIES_KEY,
                    &industries,
                    Some(self.cache_ttl_seconds),
                )
                .await;
                industries
            }
        };

        Ok(FilterOptions {
            industries,
            job_types: JobType::ALL.iter().map(JobType::as_str).collect(),
            experience_levels: ExperienceLevel::ALL
                .iter()
                .map(ExperienceLevel::as_str)
                .collect(),
        })
    }

    /// Public job detail. Drafts and pending postings are hidden.
    pub async fn show(&self, id: i64, visitor: Visitor) -> Result<JobPosting, AppError> {
        let key = job_key(id);

        let job = match get_json::<JobPosting>(self.cache.as_ref(), &key).await {
            Some(job) => job,
            None => {
                let job = self.jobs.find_by_id(id).await?.ok_or_else(not_found)?;
                set_json(self.cache.as_ref(), &key, &job, Some(self.cache_ttl_seconds)).await;
                job
            }
        };

        if !job.status.is_public() {
            return Err(not_found());
        }

        publish(
            &self.analytics,
            AnalyticsEvent::JobViewed(JobView {
                job_posting_id: job.id,
                user_id: visitor.user_id,
                ip: visitor.ip,
                user_agent: visitor.user_agent,
                referer: visitor.referer,
            }),
        );

        Ok(job)
    }

    pub async fn similar(&self, id: i64, limit: Option<i64>) -> Result<Vec<JobPosting>, AppError> {
        let job = self.jobs.find_by_id(id).await?.ok_or_else(not_found)?;
        let limit = limit
            .unwrap_or(DEFAULT_SIMILAR_LIMIT)
            .clamp(1, MAX_SIMILAR_LIMIT);

        self.jobs.similar(&job, limit).await
    }

    /// Creates a draft posting for the employer's company.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] without a company, without the post-jobs
    ///   permission, or when the package's posting limits are used up
    /// - [`AppError::Validation`] for unknown industry or skill ids
    pub async fn create(&self, user: &User, draft: JobDraft) -> Result<JobPosting, AppError> {
        let membership =
            require_membership(self.companies.as_ref(), user.id, Some(Permission::PostJobs))
                .await?;

        if let Some(usage) = current_usage(
            self.subscriptions.as_ref(),
            self.jobs.as_ref(),
            membership.company_id,
        )
        .await?
            && !usage.can_post_jobs
        {
            return Err(AppError::forbidden(
                "Job posting limit reached for your current package",
                json!(usage),
            ));
        }

        self.check_references(draft.industry_id, Some(&draft.skill_ids))
            .await?;

        let job = self
            .jobs
            .create(NewJobPosting {
                uuid: Uuid::new_v4(),
                company_id: membership.company_id,
                posted_by_user_id: user.id,
                industry_id: draft.industry_id,
                slug: slugify(&draft.title),
                title: draft.title,
                description: draft.description,
                requirements: draft.requirements,
                responsibilities: draft.responsibilities,
                benefits: draft.benefits,
                job_type: draft.job_type,
                experience_level: draft.experience_level,
                location: draft.location,
                is_remote: draft.is_remote,
                salary_min: draft.salary_min,
                salary_max: draft.salary_max,
                salary_currency: draft.salary_currency,
                salary_period: draft.salary_period,
                salary_negotiable: draft.salary_negotiable,
                positions_available: draft.positions_available,
                application_deadline: draft.application_deadline,
                expires_at: draft.expires_at,
                is_urgent: draft.is_urgent,
                skill_ids: draft.skill_ids,
            })
            .await?;

        info!(job_id = job.id, company_id = job.company_id, "Job posting created");
        Ok(job)
    }

    pub async fn employer_jobs(
        &self,
        user: &User,
        status: Option<JobStatus>,
        page: PageRequest,
    ) -> Result<Paginated<JobPosting>, AppError> {
        let membership = require_membership(self.companies.as_ref(), user.id, None).await?;

        let total = self
            .jobs
            .count_for_company(membership.company_id, status)
            .await?;
        let jobs = self
            .jobs
            .list_for_company(membership.company_id, status, page.offset(), page.limit())
            .await?;

        Ok(Paginated::new(jobs, page, total))
    }

    /// A posting of the employer's company, whatever its status.
    pub async fn employer_show(&self, user: &User, id: i64) -> Result<JobPosting, AppError> {
        let membership = require_membership(self.companies.as_ref(), user.id, None).await?;

        self.jobs
            .find_by_id(id)
            .await?
            .filter(|job| job.company_id == membership.company_id)
            .ok_or_else(not_found)
    }

    pub async fn update(&self, user: &User, id: i64, patch: JobPatch) -> Result<JobPosting, AppError> {
        let job = self.posted_by(user, id).await?;

        if let (Some(min), Some(max)) = patch.effective_salary(&job)
            && max < min
        {
            return Err(AppError::invalid_field(
                "salary_max",
                "The salary max must be greater than or equal to salary min.",
            ));
        }

        self.check_references(patch.industry_id.flatten(), patch.skill_ids.as_ref())
            .await?;

        let updated = self.jobs.update(id, patch).await?;
        self.invalidate(id).await;
        info!(job_id = id, "Job posting updated");
        Ok(updated)
    }

    pub async fn destroy(&self, user: &User, id: i64) -> Result<(), AppError> {
        self.posted_by(user, id).await?;

        if !self.jobs.soft_delete(id).await? {
            return Err(not_found());
        }
        self.invalidate(id).await;
        info!(job_id = id, "Job posting deleted");
        Ok(())
    }

    pub async fn publish(&self, user: &User, id: i64) -> Result<JobPosting, AppError> {
        let job = self.posted_by(user, id).await?;

        if !job.status.can_publish() {
            return Err(AppError::conflict(
                format!("Job cannot be published while {}", job.status),
                json!({ "status": job.status }),
            ));
        }

        let updated = self.jobs.set_status(id, JobStatus::Active).await?;
        self.invalidate(id).await;
        info!(job_id = id, "Job posting published");
        Ok(updated)
    }

    pub async fn pause(&self, user: &User, id: i64) -> Result<JobPosting, AppError> {
        let job = self.posted_by(user, id).await?;

        if !job.status.can_pause() {
            return Err(AppError::conflict(
                format!("Job cannot be paused while {}", job.status),
                json!({ "status": job.status }),
            ));
        }

        let updated = self.jobs.set_status(id, JobStatus::Paused).await?;
        self.invalidate(id).await;
        info!(job_id = id, "Job posting paused");
        Ok(updated)
    }

    /// Loads a posting that `user` created.
    async fn posted_by(&self, user: &User, id: i64) -> Result<JobPosting, AppError> {
        let job = self.jobs.find_by_id(id).await?.ok_or_else(not_found)?;

        if job.posted_by_user_id != user.id {
            return Err(AppError::forbidden("Unauthorized", json!({})));
        }
        Ok(job)
    }

    async fn check_references(
        &self,
        industry_id: Option<i64>,
        skill_ids: Option<&Vec<i64>>,
    ) -> Result<(), AppError> {
        if let Some(industry_id) = industry_id
            && !self.companies.industry_exists(industry_id).await?
        {
            return Err(AppError::invalid_field(
                "industry_id",
                "The selected industry is invalid.",
            ));
        }

        if let Some(skill_ids) = skill_ids
            && !skill_ids.is_empty()
        {
            let mut unique = skill_ids.clone();
            unique.sort_unstable();
            unique.dedup();

            let expected = unique.len();
            let found = self.companies.existing_skill_ids(unique).await?;
            if found.len() != expected {
                return Err(AppError::invalid_field(
                    "skill_ids",
                    "One or more selected skills are invalid.",
                ));
            }
        }

        Ok(())
    }

    async fn invalidate(&self, id: i64) {
        if let Err(e) = self.cache.invalidate(&job_key(id)).await {
            warn!(job_id = id, error = %e, "Failed to invalidate job cache");
        }
    }
}

fn not_found() -> AppError {
    AppError::not_found("Job not found", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::company::fixtures::owner_membership;
    use crate::domain::entities::job_posting::fixtures::job;
    use crate::domain::entities::subscription::fixtures::{package, subscription};
    use crate::domain::entities::user::fixtures::user;
    use crate::domain::entities::{CompanyMembership, JobStatus, UserRole};
    use crate::domain::repositories::{
        MockCompanyRepository, MockJobRepository, MockSubscriptionRepository,
    };
    use crate::infrastructure::cache::NullCache;

    type TestJobService =
        JobService<MockJobRepository, MockCompanyRepository, MockSubscriptionRepository>;

    fn service(
        jobs: MockJobRepository,
        companies: MockCompanyRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> (TestJobService, mpsc::Receiver<AnalyticsEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let svc = JobService::new(
            Arc::new(jobs),
            Arc::new(companies),
            Arc::new(subscriptions),
            Arc::new(NullCache),
            tx,
            60,
        );
        (svc, rx)
    }

    fn employer(id: i64) -> User {
        User {
            role: UserRole::Employer,
            ..user(id)
        }
    }

    fn draft() -> JobDraft {
        JobDraft {
            industry_id: None,
            title: "Senior Rust Engineer".to_string(),
            description: "Build the platform".to_string(),
            requirements: None,
            responsibilities: None,
            benefits: None,
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Senior,
            location: "Nairobi".to_string(),
            is_remote: true,
            salary_min: None,
            salary_max: None,
            salary_currency: "KES".to_string(),
            salary_period: SalaryPeriod::Monthly,
            salary_negotiable: false,
            positions_available: 1,
            application_deadline: None,
            expires_at: None,
            is_urgent: false,
            skill_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_search_publishes_search_event() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_count().returning(|_| Ok(1));
        jobs.expect_search()
            .withf(|_, offset, limit| *offset == 0 && *limit == 15)
            .returning(|_, _, _| Ok(vec![job(1, 1, 1)]));

        let (svc, mut rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let filter = JobFilter {
            search: Some(" rust ".to_string()),
            ..Default::default()
        };
        let page = svc
            .search(filter, PageRequest::default(), Visitor::default())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.total, 1);
        match rx.try_recv().unwrap() {
            AnalyticsEvent::JobSearched(record) => {
                assert_eq!(record.query, "rust");
                assert_eq!(record.results_count, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_without_term_is_not_recorded() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_count().returning(|_| Ok(0));
        jobs.expect_search().returning(|_, _, _| Ok(vec![]));

        let (svc, mut rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        svc.search(JobFilter::default(), PageRequest::default(), Visitor::default())
            .await
            .unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_show_hides_drafts() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| {
            Ok(Some(JobPosting {
                status: JobStatus::Draft,
                ..job(id, 1, 1)
            }))
        });

        let (svc, mut rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let err = svc.show(5, Visitor::default()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_show_records_view() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| Ok(Some(job(id, 1, 1))));

        let (svc, mut rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let visitor = Visitor {
            ip: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        svc.show(5, visitor).await.unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            AnalyticsEvent::JobViewed(JobView { job_posting_id: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_similar_clamps_limit() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| Ok(Some(job(id, 1, 1))));
        jobs.expect_similar()
            .withf(|_, limit| *limit == MAX_SIMILAR_LIMIT)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let (svc, _rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        svc.similar(1, Some(500)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_without_company_is_forbidden() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_memberships().returning(|_| Ok(vec![]));

        let (svc, _rx) = service(
            MockJobRepository::new(),
            companies,
            MockSubscriptionRepository::new(),
        );
        let err = svc.create(&employer(2), draft()).await.unwrap_err();
        assert_eq!(err.info().message, "No company associated with user");
    }

    #[tokio::test]
    async fn test_create_respects_package_limit() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(1)]));

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|company_id| Ok(Some(subscription(1, company_id, 1))));
        subscriptions
            .expect_find_package()
            .returning(|id| Ok(Some(package(id, Some(3)))));

        let mut jobs = MockJobRepository::new();
        jobs.expect_count_created_since().returning(|_, _| Ok(3));
        jobs.expect_count_for_company().returning(|_, _| Ok(1));
        jobs.expect_create().never();

        let (svc, _rx) = service(jobs, companies, subscriptions);
        let err = svc.create(&employer(2), draft()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_create_draft() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(7)]));

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|_| Ok(None));

        let mut jobs = MockJobRepository::new();
        jobs.expect_create()
            .withf(|new_job| {
                new_job.company_id == 7
                    && new_job.posted_by_user_id == 2
                    && new_job.slug == "senior-rust-engineer"
            })
            .times(1)
            .returning(|new_job| {
                Ok(JobPosting {
                    status: JobStatus::Draft,
                    ..job(10, new_job.company_id, new_job.posted_by_user_id)
                })
            });

        let (svc, _rx) = service(jobs, companies, subscriptions);
        let created = svc.create(&employer(2), draft()).await.unwrap();
        assert_eq!(created.status, JobStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_accepts_repeated_skill_ids() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(7)]));
        companies
            .expect_existing_skill_ids()
            .withf(|ids| ids == &vec![1, 4])
            .times(1)
            .returning(|ids| Ok(ids));

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|_| Ok(None));

        let mut jobs = MockJobRepository::new();
        jobs.expect_create()
            .times(1)
            .returning(|new_job| Ok(job(10, new_job.company_id, new_job.posted_by_user_id)));

        let (svc, _rx) = service(jobs, companies, subscriptions);
        let draft = JobDraft {
            skill_ids: vec![4, 1, 1, 4],
            ..draft()
        };
        assert!(svc.create(&employer(2), draft).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_skill() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(7)]));
        companies
            .expect_existing_skill_ids()
            .returning(|_| Ok(vec![1]));

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|_| Ok(None));

        let mut jobs = MockJobRepository::new();
        jobs.expect_create().never();

        let (svc, _rx) = service(jobs, companies, subscriptions);
        let draft = JobDraft {
            skill_ids: vec![1, 999],
            ..draft()
        };
        let err = svc.create(&employer(2), draft).await.unwrap_err();
        assert!(err.field_messages().iter().any(|(field, _)| field == "skill_ids"));
    }

    #[tokio::test]
    async fn test_create_requires_post_permission() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_memberships().returning(|_| {
            Ok(vec![CompanyMembership {
                can_post_jobs: false,
                ..owner_membership(7)
            }])
        });

        let (svc, _rx) = service(
            MockJobRepository::new(),
            companies,
            MockSubscriptionRepository::new(),
        );
        assert!(matches!(
            svc.create(&employer(2), draft()).await,
            Err(AppError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_only_by_poster() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| Ok(Some(job(id, 1, 99))));
        jobs.expect_update().never();

        let (svc, _rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let err = svc
            .update(&employer(2), 1, JobPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.info().message, "Unauthorized");
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_salary() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| Ok(Some(job(id, 1, 2))));

        let (svc, _rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let patch = JobPatch {
            salary_max: Some(Some(10.0)),
            ..Default::default()
        };
        let err = svc.update(&employer(2), 1, patch).await.unwrap_err();
        assert_eq!(err.field_messages()[0].0, "salary_max");
    }

    #[tokio::test]
    async fn test_publish_and_pause_transitions() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| {
            Ok(Some(JobPosting {
                status: if id == 1 {
                    JobStatus::Draft
                } else {
                    JobStatus::Closed
                },
                ..job(id, 1, 2)
            }))
        });
        jobs.expect_set_status()
            .withf(|id, status| *id == 1 && *status == JobStatus::Active)
            .times(1)
            .returning(|id, status| {
                Ok(JobPosting {
                    status,
                    ..job(id, 1, 2)
                })
            });

        let (svc, _rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );

        assert_eq!(
            svc.publish(&employer(2), 1).await.unwrap().status,
            JobStatus::Active
        );
        assert!(matches!(
            svc.publish(&employer(2), 2).await,
            Err(AppError::Conflict { .. })
        ));
        assert!(matches!(
            svc.pause(&employer(2), 1).await,
            Err(AppError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_destroy_soft_deletes() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|id| Ok(Some(job(id, 1, 2))));
        jobs.expect_soft_delete()
            .times(1)
            .returning(|_| Ok(true));

        let (svc, _rx) = service(
            jobs,
            MockCompanyRepository::new(),
            MockSubscriptionRepository::new(),
        );
        svc.destroy(&employer(2), 3).await.unwrap();
    }

    #[tokio::test]
    async fn test_filter_options() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_industries().returning(|| {
            Ok(vec![Industry {
                id: 1,
                name: "Finance".to_string(),
                slug: "finance".to_string(),
            }])
        });

        let (svc, _rx) = service(
            MockJobRepository::new(),
            companies,
            MockSubscriptionRepository::new(),
        );
        let options = svc.filter_options().await.unwrap();
        assert_eq!(options.industries.len(), 1);
        assert!(options.job_types.contains(&"full-time"));
        assert_eq!(options.experience_levels.len(), 4);
    }
}
