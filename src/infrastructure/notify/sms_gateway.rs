//! Outbound SMS gateways.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::config::VonageSettings;

const VONAGE_SMS_URL: &str = "https://rest.nexmo.com/sms/json";

/// Gateway acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsReceipt {
    pub message_id: Option<String>,
    /// Raw gateway response, stored on the delivery log.
    pub response: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("SMS delivery is not configured")]
    NotConfigured,
    #[error("SMS gateway request failed: {0}")]
    Request(String),
    #[error("SMS gateway rejected message: {0}")]
    Rejected(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Gateway name recorded on delivery logs.
    fn name(&self) -> &'static str;

    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SmsError>;
}

#[derive(Debug, Deserialize)]
struct VonageResponse {
    #[serde(default)]
    messages: Vec<VonageMessage>,
}

#[derive(Debug, Deserialize)]
struct VonageMessage {
    status: String,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

/// Vonage (Nexmo) SMS REST API.
pub struct VonageGateway {
    client: reqwest::Client,
    settings: VonageSettings,
}

impl VonageGateway {
    /// # Errors
    ///
    /// Returns [`SmsError::Request`] if the HTTP client cannot be built.
    pub fn new(settings: VonageSettings) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SmsError::Request(e.to_string()))?;

        Ok(Self { client, settings })
    }
}

/// Interprets a Vonage JSON reply. Status `"0"` means accepted.
fn parse_vonage_reply(body: Value) -> Result<SmsReceipt, SmsError> {
    let parsed: VonageResponse = serde_json::from_value(body.clone())
        .map_err(|e| SmsError::Request(format!("unexpected response: {e}")))?;

    let first = parsed
        .messages
        .into_iter()
        .next()
        .ok_or_else(|| SmsError::Rejected("empty response".to_string()))?;

    if first.status != "0" {
        return Err(SmsError::Rejected(
            first
                .error_text
                .unwrap_or_else(|| format!("status {}", first.status)),
        ));
    }

    Ok(SmsReceipt {
        message_id: first.message_id,
        response: body,
    })
}

#[async_trait]
impl SmsGateway for VonageGateway {
    fn name(&self) -> &'static str {
        "vonage"
    }

    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SmsError> {
        let params = [
            ("api_key", self.settings.api_key.as_str()),
            ("api_secret", self.settings.api_secret.as_str()),
            ("from", self.settings.from.as_str()),
            ("to", to.trim_start_matches('+')),
            ("text", message),
        ];

        let body: Value = self
            .client
            .post(VONAGE_SMS_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| SmsError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| SmsError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| SmsError::Request(e.to_string()))?;

        parse_vonage_reply(body)
    }
}

/// Gateway used when no SMS credentials are configured; every send fails.
pub struct DisabledGateway;

#[async_trait]
impl SmsGateway for DisabledGateway {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn send(&self, _to: &str, _message: &str) -> Result<SmsReceipt, SmsError> {
        Err(SmsError::NotConfigured)
    }
}

/// Accepts every message without sending it. Used by tests and local runs.
pub struct LogGateway;

#[async_trait]
impl SmsGateway for LogGateway {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SmsError> {
        tracing::info!(to, length = message.len(), "SMS delivery skipped (log gateway)");
        Ok(SmsReceipt {
            message_id: None,
            response: json!({ "gateway": "log" }),
        })
    }
}
