//! Repository trait for HR packages and subscriptions.

use async_trait::async_trait;

use crate::domain::entities::{HrPackage, NewSubscription, Subscription};
use crate::error::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Active packages ordered by `sort_order`.
    async fn packages(&self) -> Result<Vec<HrPackage>, AppError>;

    async fn find_package(&self, id: i64) -> Result<Option<HrPackage>, AppError>;

    /// The company's trial or active subscription whose period has not
    /// ended, if any.
    async fn current_for_company(&self, company_id: i64)
    -> Result<Option<Subscription>, AppError>;

    /// Inserts an active subscription. Trial or active rows whose period
    /// already ended are marked `expired` in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the company already has a current
    /// subscription.
    async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription, AppError>;

    /// Marks a subscription cancelled and turns off auto-renewal.
    async fn cancel(&self, id: i64) -> Result<Subscription, AppError>;
}
