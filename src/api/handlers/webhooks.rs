//! Handlers for gateway callbacks.

use axum::{Json, extract::State};

use crate::api::dto::webhooks::{DeliveryReceipt, ReceiptResponse};
use crate::api::extract::ValidJson;
use crate::error::AppError;
use crate::state::AppState;

/// Applies an SMS delivery receipt to the matching log row.
///
/// # Endpoint
///
/// `POST /api/webhooks/sms/delivery-receipt`
///
/// Unknown message ids and intermediate statuses are acknowledged with
/// `updated: false` so the gateway does not retry them.
pub async fn sms_delivery_receipt_handler(
    State(state): State<AppState>,
    ValidJson(receipt): ValidJson<DeliveryReceipt>,
) -> Result<Json<ReceiptResponse>, AppError> {
    let updated = state
        .sms_service
        .handle_delivery_receipt(&receipt.message_id, &receipt.status)
        .await?;

    Ok(Json(ReceiptResponse {
        success: true,
        updated,
    }))
}
