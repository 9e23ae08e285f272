//! Request extractors that reject with [`AppError`] instead of plain text.

use axum::{
    Json,
    body::Bytes,
    extract::{
        ConnectInfo, FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, header, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::net::SocketAddr;
use validator::Validate;

use super::middleware::AuthUser;
use crate::application::services::Visitor;
use crate::domain::entities::ClientInfo;
use crate::error::AppError;
use crate::state::AppState;

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON is a `400`; a body of the wrong shape or one failing
/// validation is a `422` with field errors.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Like [`ValidJson`], but an empty body yields `T::default()`.
#[derive(Debug, Clone)]
pub struct OptionalJson<T>(pub T);

impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Validate + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text(), json!({})))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value: T = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::validation("The given data was invalid.", json!({ "body": [e.to_string()] }))
        })?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::validation(
            "The given data was invalid.",
            json!({ "body": [e.body_text()] }),
        ),
        other => AppError::bad_request(other.body_text(), json!({})),
    }
}

/// Query string parameters.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::bad_request("Invalid query parameters", json!({ "reason": e.body_text() }))
            })?;
        Ok(Self(value))
    }
}

/// Path parameters. A non-numeric id is a `404`, the same as a missing row.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                AppError::not_found("Resource not found", json!({ "reason": e.body_text() }))
            })?;
        Ok(Self(value))
    }
}

/// Caller address, user agent and referer.
#[derive(Debug, Clone, Default)]
pub struct Client {
    pub info: ClientInfo,
    pub referer: Option<String>,
    pub user_id: Option<i64>,
}

impl Client {
    pub fn visitor(&self) -> Visitor {
        Visitor {
            user_id: self.user_id,
            ip: self.info.ip.clone(),
            user_agent: self.info.user_agent.clone(),
            referer: self.referer.clone(),
        }
    }
}

impl FromRequestParts<AppState> for Client {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forwarded = if state.behind_proxy {
            forwarded_ip(&parts.headers)
        } else {
            None
        };

        let ip = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(Self {
            info: ClientInfo {
                ip,
                user_agent: header_string(&parts.headers, header::USER_AGENT.as_str()),
            },
            referer: header_string(&parts.headers, header::REFERER.as_str()),
            user_id: parts.extensions.get::<AuthUser>().map(|auth| auth.user.id),
        })
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(512).collect())
}

/// First address in `X-Forwarded-For`, falling back to `X-Real-IP`.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| header_string(headers, "x-real-ip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_ip_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.4, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("198.51.100.4"));
    }

    #[test]
    fn test_forwarded_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("10.0.0.2"));
        assert!(forwarded_ip(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_visitor_copies_client_fields() {
        let client = Client {
            info: ClientInfo {
                ip: Some("127.0.0.1".into()),
                user_agent: Some("curl/8".into()),
            },
            referer: Some("https://example.com".into()),
            user_id: Some(4),
        };
        let visitor = client.visitor();
        assert_eq!(visitor.user_id, Some(4));
        assert_eq!(visitor.ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(visitor.referer.as_deref(), Some("https://example.com"));
    }
}
