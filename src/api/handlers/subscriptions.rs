//! Handlers for HR packages and company subscriptions.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::subscriptions::{
    PackageListResponse, SubscribeRequest, SubscriptionResponse, UsageResponse,
};
use crate::api::extract::ValidJson;
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/hr-packages` - active packages in display order.
pub async fn package_list_handler(
    State(state): State<AppState>,
) -> Result<Json<PackageListResponse>, AppError> {
    let packages = state.subscription_service.packages().await?;

    Ok(Json(PackageListResponse {
        success: true,
        packages,
    }))
}

/// `GET /api/employer/subscription`
///
/// # Errors
///
/// - **404**: The company has no trial or active subscription
pub async fn current_subscription_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = state.subscription_service.current(&auth.user).await?;

    Ok(Json(SubscriptionResponse {
        success: true,
        message: None,
        subscription,
    }))
}

/// Starts a subscription for the employer's company.
///
/// # Endpoint
///
/// `POST /api/employer/subscription/subscribe`
///
/// # Request Body
///
/// ```json
/// { "hr_package_id": 2, "billing_period": "yearly" }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: Subscription active from now
/// - **403**: No billing permission
/// - **409**: A subscription is already running
/// - **422**: Unknown or inactive package
pub async fn subscribe_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let subscription = state
        .subscription_service
        .subscribe(&auth.user, payload.hr_package_id, payload.billing_period)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse {
            success: true,
            message: Some("Subscription created successfully"),
            subscription,
        }),
    ))
}

/// `POST /api/employer/subscription/cancel`
pub async fn cancel_subscription_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = state.subscription_service.cancel(&auth.user).await?;

    Ok(Json(SubscriptionResponse {
        success: true,
        message: Some("Subscription cancelled successfully"),
        subscription,
    }))
}

/// `GET /api/employer/subscription/usage`
pub async fn usage_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UsageResponse>, AppError> {
    let usage = state.subscription_service.usage(&auth.user).await?;

    Ok(Json(UsageResponse {
        success: true,
        usage,
    }))
}
