//! DTOs for gateway callbacks.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// SMS delivery receipt. Vonage posts `messageId`; `message-id` and
/// `message_id` are accepted as well.
#[derive(Debug, Deserialize, Validate)]
pub struct DeliveryReceipt {
    #[serde(alias = "messageId", alias = "message-id")]
    #[validate(length(min = 1, max = 64))]
    pub message_id: String,

    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub success: bool,
    /// Whether a matching SMS log row was updated.
    pub updated: bool,
}
