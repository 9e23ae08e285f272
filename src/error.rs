//! Unified application error type and its HTTP representation.
//!
//! Every fallible request path returns [`AppError`]. The error renders as
//!
//! ```json
//! { "success": false, "error": { "code": "...", "message": "...", "details": {} } }
//! ```
//!
//! Validation errors put a field → messages map into `details`.

use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorInfo,
}

/// Error payload nested under `error` in every failed response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    Unauthorized {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    Forbidden {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    Locked {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    Internal {
        code: &'static str,
        message: String,
        details: Value,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code: "validation_error",
            message: message.into(),
            details,
        }
    }

    /// Single-field validation failure, shaped like the output of
    /// `From<ValidationErrors>`.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::validation(
            "The given data was invalid.",
            json!({ field: [message] }),
        )
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            code: "bad_request",
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            code: "unauthorized",
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            code: "forbidden",
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            code: "not_found",
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            code: "conflict",
            message: message.into(),
            details,
        }
    }

    pub fn locked(message: impl Into<String>, details: Value) -> Self {
        Self::Locked {
            code: "ACCOUNT_LOCKED",
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
            details,
        }
    }

    /// Replaces the machine-readable code, keeping status and message.
    pub fn with_code(mut self, new_code: &'static str) -> Self {
        match &mut self {
            Self::Validation { code, .. }
            | Self::BadRequest { code, .. }
            | Self::Unauthorized { code, .. }
            | Self::Forbidden { code, .. }
            | Self::NotFound { code, .. }
            | Self::Conflict { code, .. }
            | Self::Locked { code, .. }
            | Self::Internal { code, .. } => *code = new_code,
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Locked { .. } => StatusCode::LOCKED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Owned copy of the response payload, used by the HTML layer for toasts.
    pub fn info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            Self::Validation {
                code,
                message,
                details,
            }
            | Self::BadRequest {
                code,
                message,
                details,
            }
            | Self::Unauthorized {
                code,
                message,
                details,
            }
            | Self::Forbidden {
                code,
                message,
                details,
            }
            | Self::NotFound {
                code,
                message,
                details,
            }
            | Self::Conflict {
                code,
                message,
                details,
            }
            | Self::Locked {
                code,
                message,
                details,
            }
            | Self::Internal {
                code,
                message,
                details,
            } => (*code, message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }

    /// First message per field for validation errors, empty otherwise.
    pub fn field_messages(&self) -> Vec<(String, String)> {
        let Self::Validation { details, .. } = self else {
            return Vec::new();
        };

        details
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(field, messages)| {
                        messages
                            .as_array()
                            .and_then(|m| m.first())
                            .and_then(|m| m.as_str())
                            .map(|m| (field.clone(), m.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let Self::Internal {
            message, details, ..
        } = &self
        {
            tracing::error!(%message, %details, "Request failed with internal error");
        }

        let body = ErrorBody {
            success: false,
            error: self.info(),
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Map::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<Value> = field_errors
                .iter()
                .map(|e| Value::String(describe(&field, e)))
                .collect();
            fields.insert(field.to_string(), Value::Array(messages));
        }

        Self::validation("The given data was invalid.", Value::Object(fields))
    }
}

/// Human-readable message for a validator error without an explicit message.
fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let field = field.replace('_', " ");
    match error.code.as_ref() {
        "required" => format!("The {field} field is required."),
        "email" => format!("The {field} must be a valid email address."),
        "url" => format!("The {field} must be a valid URL."),
        "length" => format!("The {field} has an invalid length."),
        "range" => format!("The {field} is out of range."),
        "must_match" => format!("The {field} confirmation does not match."),
        other => format!("The {field} is invalid ({other})."),
    }
}

/// Adds a field error with an explicit message to an error bag.
pub fn push_field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) {
    errors.add(field, ValidationError::new(code).with_message(message.into()));
}

/// Turns a possibly-empty error bag into a result.
pub fn into_result(errors: ValidationErrors) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// Converts driver errors into [`AppError`].
///
/// Unique violations become `409 Conflict`; everything else is an internal
/// error whose driver text stays in the logs.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    if matches!(e, sqlx::Error::RowNotFound) {
        return AppError::not_found("Record not found", json!({}));
    }

    tracing::error!(error = %e, "Database error");
    AppError::internal("Database error", json!({}))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}
