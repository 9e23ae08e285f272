//! HR packages and company subscriptions.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::membership::{Permission, require_membership};
use crate::domain::entities::subscription::period_end;
use crate::domain::entities::{
    BillingPeriod, HrPackage, JobStatus, NewSubscription, Subscription, SubscriptionUsage, User,
};
use crate::domain::repositories::{CompanyRepository, JobRepository, SubscriptionRepository};
use crate::error::AppError;

/// Usage of the company's current subscription, if it has one.
pub async fn current_usage<S, J>(
    subscriptions: &S,
    jobs: &J,
    company_id: i64,
) -> Result<Option<SubscriptionUsage>, AppError>
where
    S: SubscriptionRepository + ?Sized,
    J: JobRepository + ?Sized,
{
    let Some(subscription) = subscriptions.current_for_company(company_id).await? else {
        return Ok(None);
    };

    let package = subscriptions
        .find_package(subscription.hr_package_id)
        .await?
        .ok_or_else(|| {
            AppError::internal(
                "Subscription package missing",
                json!({ "package_id": subscription.hr_package_id }),
            )
        })?;

    let posts_used = jobs
        .count_created_since(company_id, subscription.starts_at)
        .await?;
    let active_jobs = jobs
        .count_for_company(company_id, Some(JobStatus::Active))
        .await?;

    Ok(Some(SubscriptionUsage::new(
        &package,
        &subscription,
        posts_used,
        active_jobs,
    )))
}

pub struct SubscriptionService<S, C, J>
where
    S: SubscriptionRepository,
    C: CompanyRepository,
    J: JobRepository,
{
    subscriptions: Arc<S>,
    companies: Arc<C>,
    jobs: Arc<J>,
}

impl<S, C, J> SubscriptionService<S, C, J>
where
    S: SubscriptionRepository,
    C: CompanyRepository,
    J: JobRepository,
{
    pub fn new(subscriptions: Arc<S>, companies: Arc<C>, jobs: Arc<J>) -> Self {
        Self {
            subscriptions,
            companies,
            jobs,
        }
    }

    pub async fn packages(&self) -> Result<Vec<HrPackage>, AppError> {
        self.subscriptions.packages().await
    }

    pub async fn current(&self, user: &User) -> Result<Subscription, AppError> {
        let membership = require_membership(self.companies.as_ref(), user.id, None).await?;

        self.subscriptions
            .current_for_company(membership.company_id)
            .await?
            .ok_or_else(no_subscription)
    }

    /// Starts a subscription for the employer's company. Payment is not
    /// captured here.
    pub async fn subscribe(
        &self,
        user: &User,
        package_id: i64,
        billing_period: BillingPeriod,
    ) -> Result<Subscription, AppError> {
        let membership = require_membership(
            self.companies.as_ref(),
            user.id,
            Some(Permission::ManageBilling),
        )
        .await?;

        let package = self
            .subscriptions
            .find_package(package_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                AppError::invalid_field("package_id", "The selected package is invalid.")
            })?;

        if self
            .subscriptions
            .current_for_company(membership.company_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Company already has an active subscription",
                json!({}),
            ));
        }

        let starts_at = Utc::now();
        let subscription = self
            .subscriptions
            .create(NewSubscription {
                uuid: Uuid::new_v4(),
                company_id: membership.company_id,
                hr_package_id: package.id,
                billing_period,
                amount: package.price_for(billing_period),
                currency: package.currency.clone(),
                starts_at,
                ends_at: period_end(starts_at, billing_period),
            })
            .await?;

        info!(
            company_id = membership.company_id,
            package = %package.slug,
            period = %billing_period,
            "Subscription started"
        );
        Ok(subscription)
    }

    pub async fn cancel(&self, user: &User) -> Result<Subscription, AppError> {
        let membership = require_membership(
            self.companies.as_ref(),
            user.id,
            Some(Permission::ManageBilling),
        )
        .await?;

        let current = self
            .subscriptions
            .current_for_company(membership.company_id)
            .await?
            .ok_or_else(no_subscription)?;

        let cancelled = self.subscriptions.cancel(current.id).await?;
        info!(company_id = membership.company_id, "Subscription cancelled");
        Ok(cancelled)
    }

    pub async fn usage(&self, user: &User) -> Result<SubscriptionUsage, AppError> {
        let membership = require_membership(self.companies.as_ref(), user.id, None).await?;

        current_usage(
            self.subscriptions.as_ref(),
            self.jobs.as_ref(),
            membership.company_id,
        )
        .await?
        .ok_or_else(no_subscription)
    }
}

fn no_subscription() -> AppError {
    AppError::not_found("No active subscription", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SubscriptionStatus;
    use crate::domain::entities::company::fixtures::owner_membership;
    use crate::domain::entities::subscription::fixtures::{package, subscription};
    use crate::domain::entities::user::fixtures::user;
    use crate::domain::repositories::{
        MockCompanyRepository, MockJobRepository, MockSubscriptionRepository,
    };

    fn companies() -> MockCompanyRepository {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_memberships()
            .returning(|_| Ok(vec![owner_membership(3)]));
        companies
    }

    fn service(
        subscriptions: MockSubscriptionRepository,
        jobs: MockJobRepository,
    ) -> SubscriptionService<MockSubscriptionRepository, MockCompanyRepository, MockJobRepository>
    {
        SubscriptionService::new(Arc::new(subscriptions), Arc::new(companies()), Arc::new(jobs))
    }

    #[tokio::test]
    async fn test_subscribe_yearly() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_package()
            .returning(|id| Ok(Some(package(id, None))));
        subscriptions
            .expect_current_for_company()
            .returning(|_| Ok(None));
        subscriptions
            .expect_create()
            .withf(|new_sub| {
                new_sub.company_id == 3
                    && new_sub.amount == 49990.0
                    && new_sub.billing_period == BillingPeriod::Yearly
                    && new_sub.ends_at > new_sub.starts_at + chrono::Duration::days(360)
            })
            .times(1)
            .returning(|new_sub| Ok(subscription(1, new_sub.company_id, new_sub.hr_package_id)));

        let sub = service(subscriptions, MockJobRepository::new())
            .subscribe(&user(1), 2, BillingPeriod::Yearly)
            .await
            .unwrap();
        assert_eq!(sub.company_id, 3);
    }

    #[tokio::test]
    async fn test_subscribe_twice_conflicts() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_find_package()
            .returning(|id| Ok(Some(package(id, None))));
        subscriptions
            .expect_current_for_company()
            .returning(|company_id| Ok(Some(subscription(1, company_id, 1))));
        subscriptions.expect_create().never();

        let err = service(subscriptions, MockJobRepository::new())
            .subscribe(&user(1), 2, BillingPeriod::Monthly)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_cancel_without_subscription() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|_| Ok(None));

        let err = service(subscriptions, MockJobRepository::new())
            .cancel(&user(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_cancel() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|company_id| Ok(Some(subscription(8, company_id, 1))));
        subscriptions
            .expect_cancel()
            .withf(|id| *id == 8)
            .returning(|id| {
                Ok(Subscription {
                    status: SubscriptionStatus::Cancelled,
                    auto_renew: false,
                    ..subscription(id, 3, 1)
                })
            });

        let cancelled = service(subscriptions, MockJobRepository::new())
            .cancel(&user(1))
            .await
            .unwrap();
        assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
        assert!(!cancelled.auto_renew);
    }

    #[tokio::test]
    async fn test_usage_counts_posts_since_period_start() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_current_for_company()
            .returning(|company_id| Ok(Some(subscription(1, company_id, 1))));
        subscriptions
            .expect_find_package()
            .returning(|id| Ok(Some(package(id, Some(10)))));

        let mut jobs = MockJobRepository::new();
        jobs.expect_count_created_since()
            .withf(|company_id, _| *company_id == 3)
            .returning(|_, _| Ok(4));
        jobs.expect_count_for_company()
            .withf(|_, status| *status == Some(JobStatus::Active))
            .returning(|_, _| Ok(1));

        let usage = service(subscriptions, jobs).usage(&user(1)).await.unwrap();
        assert_eq!(usage.job_posts_used, 4);
        assert_eq!(usage.active_jobs, 1);
        assert!(usage.can_post_jobs);
    }
}
