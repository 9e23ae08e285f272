//! HR packages and company subscriptions.

use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::enums::{BillingPeriod, PackageTier, SubscriptionStatus};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HrPackage {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub tier: PackageTier,
    pub description: Option<String>,
    pub price_monthly: f64,
    pub price_yearly: f64,
    pub currency: String,
    /// `None` means unlimited.
    pub max_job_posts: Option<i32>,
    pub max_active_jobs: Option<i32>,
    pub max_users: Option<i32>,
    pub is_popular: bool,
    pub is_active: bool,
    pub sort_order: i32,
}

impl HrPackage {
    pub fn price_for(&self, period: BillingPeriod) -> f64 {
        match period {
            BillingPeriod::Monthly => self.price_monthly,
            BillingPeriod::Yearly => self.price_yearly,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub uuid: Uuid,
    pub company_id: i64,
    pub hr_package_id: i64,
    pub package_name: String,
    #[sqlx(try_from = "String")]
    pub billing_period: BillingPeriod,
    #[sqlx(try_from = "String")]
    pub status: SubscriptionStatus,
    pub amount: f64,
    pub currency: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub uuid: Uuid,
    pub company_id: i64,
    pub hr_package_id: i64,
    pub billing_period: BillingPeriod,
    pub amount: f64,
    pub currency: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// End of a billing period starting at `start`.
pub fn period_end(start: DateTime<Utc>, period: BillingPeriod) -> DateTime<Utc> {
    let months = match period {
        BillingPeriod::Monthly => Months::new(1),
        BillingPeriod::Yearly => Months::new(12),
    };
    start.checked_add_months(months).unwrap_or(start)
}

/// Usage of a subscription against its package limits.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionUsage {
    pub package: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub job_posts_used: i64,
    pub job_posts_limit: Option<i32>,
    pub active_jobs: i64,
    pub active_jobs_limit: Option<i32>,
    pub can_post_jobs: bool,
}

impl SubscriptionUsage {
    pub fn new(
        package: &HrPackage,
        subscription: &Subscription,
        job_posts_used: i64,
        active_jobs: i64,
    ) -> Self {
        let within = |used: i64, limit: Option<i32>| limit.is_none_or(|l| used < i64::from(l));
        Self {
            package: package.name.clone(),
            period_start: subscription.starts_at,
            period_end: subscription.ends_at,
            job_posts_used,
            job_posts_limit: package.max_job_posts,
            active_jobs,
            active_jobs_limit: package.max_active_jobs,
            can_post_jobs: within(job_posts_used, package.max_job_posts)
                && within(active_jobs, package.max_active_jobs),
        }
    }
}
