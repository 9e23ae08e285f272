//! PostgreSQL implementation of packages and subscriptions.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{HrPackage, NewSubscription, Subscription};
use crate::domain::repositories::SubscriptionRepository;
use crate::error::AppError;

const PACKAGE_COLUMNS: &str = r#"
    id, name, slug, tier, description, price_monthly, price_yearly, currency,
    max_job_posts, max_active_jobs, max_users, is_popular, is_active, sort_order
"#;

const SUBSCRIPTION_SELECT: &str = r#"
    SELECT s.id, s.uuid, s.company_id, s.hr_package_id, p.name AS package_name,
           s.billing_period, s.status, s.amount, s.currency, s.starts_at, s.ends_at,
           s.cancelled_at, s.auto_renew, s.created_at
    FROM subscriptions s
    JOIN hr_packages p ON p.id = s.hr_package_id
"#;

pub struct PgSubscriptionRepository {
    pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<Subscription, AppError> {
        let sql = format!("{SUBSCRIPTION_SELECT} WHERE s.id = $1");

        sqlx::query_as::<_, Subscription>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Subscription not found", json!({ "id": id })))
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn packages(&self) -> Result<Vec<HrPackage>, AppError> {
        let sql = format!(
            "SELECT {PACKAGE_COLUMNS} FROM hr_packages WHERE is_active = TRUE ORDER BY sort_order, id"
        );

        let packages = sqlx::query_as::<_, HrPackage>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(packages)
    }

    async fn find_package(&self, id: i64) -> Result<Option<HrPackage>, AppError> {
        let sql = format!("SELECT {PACKAGE_COLUMNS} FROM hr_packages WHERE id = $1");

        let package = sqlx::query_as::<_, HrPackage>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(package)
    }

    async fn current_for_company(
        &self,
        company_id: i64,
    ) -> Result<Option<Subscription>, AppError> {
        let sql = format!(
            r#"
            {SUBSCRIPTION_SELECT}
            WHERE s.company_id = $1
              AND s.status IN ('trial', 'active')
              AND s.ends_at > NOW()
            ORDER BY s.created_at DESC
            LIMIT 1
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(company_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(subscription)
    }

    async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await?;

        // uq_subscriptions_current covers lapsed trial/active rows too.
        let expired = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'expired', auto_renew = FALSE, updated_at = NOW()
            WHERE company_id = $1 AND status IN ('trial', 'active') AND ends_at <= NOW()
            "#,
        )
        .bind(new_subscription.company_id)
        .execute(&mut *tx)
        .await?;

        if expired.rows_affected() > 0 {
            debug!(
                company_id = new_subscription.company_id,
                "Lapsed subscription marked expired"
            );
        }

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscriptions (
                uuid, company_id, hr_package_id, billing_period, status, amount, currency,
                starts_at, ends_at
            )
            VALUES ($1, $2, $3, $4, 'active', $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(new_subscription.uuid)
        .bind(new_subscription.company_id)
        .bind(new_subscription.hr_package_id)
        .bind(new_subscription.billing_period.as_str())
        .bind(new_subscription.amount)
        .bind(&new_subscription.currency)
        .bind(new_subscription.starts_at)
        .bind(new_subscription.ends_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match crate::error::map_sqlx_error(e) {
            AppError::Conflict { .. } => AppError::conflict(
                "Company already has an active subscription",
                json!({ "company_id": new_subscription.company_id }),
            ),
            other => other,
        })?;

        tx.commit().await?;

        self.fetch(id).await
    }

    async fn cancel(&self, id: i64) -> Result<Subscription, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'cancelled', cancelled_at = NOW(), auto_renew = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Subscription not found",
                json!({ "id": id }),
            ));
        }

        self.fetch(id).await
    }
}
