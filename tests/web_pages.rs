mod common;

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;

fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

fn session_token(response: &axum_test::TestResponse) -> Option<String> {
    set_cookies(response).into_iter().find_map(|cookie| {
        let value = cookie.strip_prefix("auth_token=")?;
        let token = value.split(';').next()?;
        (!token.is_empty()).then(|| token.to_string())
    })
}

async fn sign_up(server: &TestServer, email: &str) {
    server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Amina",
            "last_name": "Otieno",
            "email": email,
            "password": common::PASSWORD,
            "password_confirmation": common::PASSWORD,
            "role": "job-seeker"
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[sqlx::test]
async fn test_home_redirects_to_jobs(pool: PgPool) {
    let server = common::web_server(pool);

    let response = server.get("/").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/jobs");
}

#[sqlx::test]
async fn test_login_page_renders(pool: PgPool) {
    let server = common::web_server(pool);

    let response = server.get("/login").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("action=\"/login\""));
    assert!(html.contains("HR Talent"));
}

#[sqlx::test]
async fn test_jobs_page_renders(pool: PgPool) {
    let (api, _rx) = common::api_server(pool.clone());
    let employer = common::register_employer(&api, "hr@acme.co.ke", "Acme Ltd").await;
    common::create_active_job(&api, &employer, "Backend Engineer").await;
    let server = common::web_server(pool);

    let response = server.get("/jobs").add_query_param("search", "backend").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Backend Engineer"));
    assert!(html.contains("Acme Ltd"));
}

#[sqlx::test]
async fn test_dashboard_requires_session(pool: PgPool) {
    let server = common::web_server(pool);

    let response = server.get("/dashboard").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");
}

#[sqlx::test]
async fn test_dashboard_with_stale_cookie_clears_session(pool: PgPool) {
    let server = common::web_server(pool);

    let response = server
        .get("/dashboard")
        .add_header(header::COOKIE, "auth_token=not.a.jwt")
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert!(
        set_cookies(&response)
            .iter()
            .any(|cookie| cookie.starts_with("auth_token=;"))
    );
}

#[sqlx::test]
async fn test_login_form_starts_session(pool: PgPool) {
    let (api, _rx) = common::api_server(pool.clone());
    sign_up(&api, "amina@example.com").await;
    let server = common::web_server(pool);

    let response = server
        .post("/login")
        .form(&[("email", "amina@example.com"), ("password", common::PASSWORD)])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/dashboard");
    let token = session_token(&response).expect("session cookie");

    let dashboard = server
        .get("/dashboard")
        .add_header(header::COOKIE, format!("auth_token={token}"))
        .await;
    dashboard.assert_status_ok();
    assert!(dashboard.text().contains("Amina"));
}

#[sqlx::test]
async fn test_login_form_wrong_password(pool: PgPool) {
    let (api, _rx) = common::api_server(pool.clone());
    sign_up(&api, "amina@example.com").await;
    let server = common::web_server(pool);

    let response = server
        .post("/login")
        .form(&[("email", "amina@example.com"), ("password", "wrong-password")])
        .await;

    response.assert_status_unauthorized();
    assert!(session_token(&response).is_none());
    assert!(response.text().contains("Invalid credentials"));
}

#[sqlx::test]
async fn test_register_form_signs_in(pool: PgPool) {
    let server = common::web_server(pool);

    let response = server
        .post("/register")
        .form(&[
            ("first_name", "Amina"),
            ("last_name", "Otieno"),
            ("email", "amina@example.com"),
            ("phone", ""),
            ("password", common::PASSWORD),
            ("password_confirmation", common::PASSWORD),
            ("role", "job-seeker"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/dashboard");
    assert!(session_token(&response).is_some());
}

#[sqlx::test]
async fn test_logout_clears_session(pool: PgPool) {
    let (api, _rx) = common::api_server(pool.clone());
    sign_up(&api, "amina@example.com").await;
    let server = common::web_server(pool);
    let login = server
        .post("/login")
        .form(&[("email", "amina@example.com"), ("password", common::PASSWORD)])
        .await;
    let token = session_token(&login).expect("session cookie");

    let response = server
        .post("/logout")
        .add_header(header::COOKIE, format!("auth_token={token}"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");

    server
        .get("/dashboard")
        .add_header(header::COOKIE, format!("auth_token={token}"))
        .await
        .assert_status(StatusCode::SEE_OTHER);
}
