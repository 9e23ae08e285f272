//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: DB, cache, analytics queue (public)
//! - `/api/auth/*`       - Account endpoints (strict rate limit)
//! - `/api/*`            - REST API (Bearer token where the group requires it)
//! - `/login`, `/jobs`, `/dashboard`, ... - Web pages (cookie session where required)
//! - `/static/*`         - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, one quota for credential
//!   endpoints and one for everything else
//! - **Authentication** - Bearer token (API) or cookie session (web)
//! - **Role guards** - Job seeker and employer groups
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, not_found_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Requests per minute and client IP for each quota.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    /// Login, registration, verification and password reset.
    pub auth_per_minute: u32,
    /// Every other API endpoint and page.
    pub api_per_minute: u32,
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `limits` - per-minute quotas; the client IP is taken from proxy headers
///   when `state.behind_proxy` is set
pub fn app_router(state: AppState, limits: RateLimits) -> NormalizePath<Router> {
    let behind_proxy = state.behind_proxy;
    let strict = || rate_limit::layer(limits.auth_per_minute, behind_proxy);
    let general = || rate_limit::layer(limits.api_per_minute, behind_proxy);
    let bearer = || middleware::from_fn_with_state(state.clone(), auth::layer);

    let seeker = api::routes::job_seeker_routes()
        .route_layer(middleware::from_fn(auth::require_job_seeker))
        .route_layer(bearer());

    let employer = api::routes::employer_routes()
        .route_layer(middleware::from_fn(auth::require_employer))
        .route_layer(bearer());

    let general_api = Router::new()
        .merge(api::routes::public_routes())
        .merge(api::routes::session_routes().route_layer(bearer()))
        .merge(seeker)
        .merge(employer)
        .layer(general());

    let api_router = Router::new()
        .merge(api::routes::auth_routes().layer(strict()))
        .merge(general_api)
        .fallback(not_found_handler);

    let web_protected = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .layer(general());

    let web_router = Router::new()
        .merge(web_protected)
        .merge(web::routes::public_routes().layer(general()))
        .merge(web::routes::form_routes().layer(strict()));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(web_router)
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
