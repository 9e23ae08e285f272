#![allow(dead_code)]

use axum::{Router, middleware};
use axum_test::TestServer;
use hr_talent::api;
use hr_talent::api::handlers::{health_handler, not_found_handler};
use hr_talent::api::middleware::auth;
use hr_talent::config::{Config, SecuritySettings};
use hr_talent::domain::analytics_event::AnalyticsEvent;
use hr_talent::infrastructure::cache::NullCache;
use hr_talent::infrastructure::notify::{LogGateway, LogMailer};
use hr_talent::state::AppState;
use hr_talent::web;
use hr_talent::web::middleware::web_auth;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
        app_name: "HR Talent".to_string(),
        app_url: "http://localhost:3000".to_string(),
        analytics_queue_capacity: 1_000,
        analytics_worker_concurrency: 1,
        behind_proxy: false,
        cache_ttl_seconds: 60,
        jwt_secret: "test-jwt-secret-0123456789abcdef".to_string(),
        jwt_ttl_minutes: 60,
        token_signing_secret: "test-signing-secret".to_string(),
        security: SecuritySettings::default(),
        rate_limit_auth: 5,
        rate_limit_api: 60,
        mail_from: "HR Talent <no-reply@localhost>".to_string(),
        smtp: None,
        vonage: None,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
    }
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<AnalyticsEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        pool,
        &test_config(),
        Arc::new(NullCache::new()),
        tx,
        Arc::new(LogMailer),
        Arc::new(LogGateway),
    );

    (state, rx)
}

/// API routes with the same guards as the application router, minus rate
/// limits.
pub fn api_router(state: AppState) -> Router {
    let bearer = || middleware::from_fn_with_state(state.clone(), auth::layer);

    let api = Router::new()
        .merge(api::routes::auth_routes())
        .merge(api::routes::public_routes())
        .merge(api::routes::session_routes().route_layer(bearer()))
        .merge(
            api::routes::job_seeker_routes()
                .route_layer(middleware::from_fn(auth::require_job_seeker))
                .route_layer(bearer()),
        )
        .merge(
            api::routes::employer_routes()
                .route_layer(middleware::from_fn(auth::require_employer))
                .route_layer(bearer()),
        )
        .fallback(not_found_handler);

    Router::new()
        .route("/health", axum::routing::get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

pub fn api_server(pool: PgPool) -> (TestServer, mpsc::Receiver<AnalyticsEvent>) {
    let (state, rx) = create_test_state(pool);
    (TestServer::new(api_router(state)).unwrap(), rx)
}

/// Page routes with cookie authentication, minus rate limits.
pub fn web_server(pool: PgPool) -> TestServer {
    let (state, _rx) = create_test_state(pool);

    let protected = web::routes::protected_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), web_auth::layer),
    );

    let app = Router::new()
        .merge(protected)
        .merge(web::routes::public_routes())
        .merge(web::routes::form_routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

pub async fn register_seeker(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Amina",
            "last_name": "Otieno",
            "email": email,
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
            "role": "job-seeker"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub async fn register_employer(server: &TestServer, email: &str, company: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Brian",
            "last_name": "Kamau",
            "email": email,
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
            "role": "employer",
            "company_name": company,
            "industry_id": 1
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Creates a draft posting and returns its id.
pub async fn create_job(server: &TestServer, token: &str, title: &str) -> i64 {
    let response = server
        .post("/api/employer/jobs")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "title": title,
            "description": "Design and run backend services.",
            "type": "full-time",
            "experience_level": "mid",
            "location": "Nairobi",
            "salary_min": 150000,
            "salary_max": 250000
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["job"]["id"].as_i64().unwrap()
}

/// Creates and publishes a posting and returns its id.
pub async fn create_active_job(server: &TestServer, token: &str, title: &str) -> i64 {
    let id = create_job(server, token, title).await;
    server
        .post(&format!("/api/employer/jobs/{id}/publish"))
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .assert_status_ok();
    id
}

pub async fn email_verification_token(pool: &PgPool, email: &str) -> String {
    sqlx::query_scalar("SELECT email_verification_token FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}
