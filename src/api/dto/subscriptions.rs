//! DTOs for HR packages and subscriptions.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{BillingPeriod, HrPackage, Subscription, SubscriptionUsage};

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    pub hr_package_id: i64,
    pub billing_period: BillingPeriod,
}

#[derive(Debug, Serialize)]
pub struct PackageListResponse {
    pub success: bool,
    pub packages: Vec<HrPackage>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub subscription: Subscription,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub success: bool,
    pub usage: SubscriptionUsage,
}
