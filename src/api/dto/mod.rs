//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod applications;
pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod pagination;
pub mod subscriptions;
pub mod webhooks;

use serde::Serialize;

/// Body of endpoints that only report an outcome.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
