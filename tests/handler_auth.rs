mod common;

use axum::http::StatusCode;
use hr_talent::utils::secrets::hash_token;
use serde_json::{Value, json};
use sqlx::PgPool;

// ─── REGISTER ────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_register_job_seeker(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Amina",
            "last_name": "Otieno",
            "email": "Amina@Example.com",
            "phone": "+254700000001",
            "password": "secret123",
            "password_confirmation": "secret123",
            "role": "job-seeker"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["user"]["email"], "amina@example.com");
    assert_eq!(json["user"]["role"], "job-seeker");
    assert!(json["user"].get("password_hash").is_none());

    let completion: i32 = sqlx::query_scalar(
        "SELECT s.profile_completion_percentage FROM job_seekers s JOIN users u ON u.id = s.user_id WHERE u.email = $1",
    )
    .bind("amina@example.com")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(completion, 20);

    let emails: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM email_logs WHERE to_email = $1")
        .bind("amina@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(emails >= 1);
}

#[sqlx::test]
async fn test_register_employer_creates_company(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    let token = common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;

    let response = server
        .get("/api/auth/me")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["user"]["role"], "employer");
    assert_eq!(json["user"]["companies"][0]["company_name"], "Acme Ltd");
    assert_eq!(json["user"]["companies"][0]["role_type"], "owner");
    assert!(json["user"]["job_seeker"].is_null());
}

#[sqlx::test]
async fn test_register_employer_requires_company_name(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Brian",
            "last_name": "Kamau",
            "email": "hr@acme.co.ke",
            "password": "secret123",
            "password_confirmation": "secret123",
            "role": "employer"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<Value>();
    assert!(json["error"]["details"]["company_name"].is_array());
}

#[sqlx::test]
async fn test_register_validation_errors(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "",
            "last_name": "Otieno",
            "email": "not-an-email",
            "password": "secret123",
            "password_confirmation": "different",
            "role": "admin"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let details = &response.json::<Value>()["error"]["details"];
    assert!(details["first_name"].is_array());
    assert!(details["email"].is_array());
    assert!(details["password"].is_array());
    assert!(details["role"].is_array());
}

#[sqlx::test]
async fn test_register_duplicate_email(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    common::register_seeker(&server, "amina@example.com").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Amina",
            "last_name": "Otieno",
            "email": "amina@example.com",
            "password": "secret123",
            "password_confirmation": "secret123",
            "role": "job-seeker"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["error"]["details"]["email"].is_array());
}

// ─── LOGIN ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_login_success(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    common::register_seeker(&server, "amina@example.com").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "AMINA@example.com", "password": common::PASSWORD }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["expires_in"], 3600);
    assert!(json["access_token"].as_str().unwrap().len() > 20);
}

#[sqlx::test]
async fn test_login_unknown_email(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": "secret123" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"]["message"], "Invalid credentials");
}

#[sqlx::test]
async fn test_login_locks_after_repeated_failures(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    common::register_seeker(&server, "amina@example.com").await;

    for attempt in 1..=4 {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "amina@example.com", "password": "wrong-password" }))
            .await;
        response.assert_status_unauthorized();
        assert_eq!(
            response.json::<Value>()["error"]["details"]["remaining_attempts"],
            5 - attempt
        );
    }

    let locking = server
        .post("/api/auth/login")
        .json(&json!({ "email": "amina@example.com", "password": "wrong-password" }))
        .await;
    locking.assert_status_unauthorized();
    assert!(
        locking.json::<Value>()["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Account locked")
    );

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "amina@example.com", "password": common::PASSWORD }))
        .await;
    response.assert_status(StatusCode::LOCKED);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "ACCOUNT_LOCKED");
    assert!(json["error"]["details"]["remaining_seconds"].as_i64().unwrap() > 0);

    let failures: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM authentication_logs WHERE email = $1 AND success = FALSE",
    )
    .bind("amina@example.com")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(failures, 6);
}

#[sqlx::test]
async fn test_login_deactivated_account(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    common::register_seeker(&server, "amina@example.com").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE email = $1")
        .bind("amina@example.com")
        .execute(&pool)
        .await
        .unwrap();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "amina@example.com", "password": common::PASSWORD }))
        .await;

    response.assert_status_unauthorized();
}

// ─── SESSION ─────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_me_requires_token(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server.get("/api/auth/me").await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"]["code"], "TOKEN_ABSENT");
}

#[sqlx::test]
async fn test_garbage_token_rejected(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server
        .get("/api/auth/me")
        .add_header("Authorization", "Bearer not.a.jwt")
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"]["code"], "TOKEN_INVALID");
}

#[sqlx::test]
async fn test_logout_revokes_token(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    let token = common::register_seeker(&server, "amina@example.com").await;

    let response = server
        .post("/api/auth/logout")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Successfully logged out");

    server
        .get("/api/auth/me")
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .assert_status_unauthorized();
}

#[sqlx::test]
async fn test_refresh_rotates_token(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    let token = common::register_seeker(&server, "amina@example.com").await;

    let response = server
        .post("/api/auth/refresh")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;
    response.assert_status_ok();
    let fresh = response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(fresh, token);

    server
        .get("/api/auth/me")
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .assert_status_unauthorized();
    server
        .get("/api/auth/me")
        .add_header("Authorization", format!("Bearer {fresh}"))
        .await
        .assert_status_ok();
}

// ─── VERIFICATION ────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_verify_email(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    common::register_seeker(&server, "amina@example.com").await;
    let token = common::email_verification_token(&pool, "amina@example.com").await;

    let response = server
        .post("/api/auth/verify-email")
        .json(&json!({ "token": token }))
        .await;
    response.assert_status_ok();

    let verified: bool = sqlx::query_scalar(
        "SELECT email_verified_at IS NOT NULL FROM users WHERE email = $1",
    )
    .bind("amina@example.com")
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(verified);
}

#[sqlx::test]
async fn test_verify_email_unknown_token(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server
        .post("/api/auth/verify-email")
        .json(&json!({ "token": "definitely-not-issued" }))
        .await;

    assert!(response.status_code().is_client_error());
}

#[sqlx::test]
async fn test_forgot_password_unknown_email_succeeds(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "ghost@example.com" }))
        .await;

    response.assert_status_ok();
}

#[sqlx::test]
async fn test_reset_password_then_login(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    common::register_seeker(&server, "amina@example.com").await;

    server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "amina@example.com" }))
        .await
        .assert_status_ok();

    // The mailed token never leaves the service; swap in one the test knows.
    let secret = common::test_config().token_signing_secret;
    sqlx::query("UPDATE password_reset_tokens SET token_hash = $1 WHERE email = $2")
        .bind(hash_token(&secret, "emailed-reset-token"))
        .bind("amina@example.com")
        .execute(&pool)
        .await
        .unwrap();

    let reset = || {
        server.post("/api/auth/reset-password").json(&json!({
            "email": "amina@example.com",
            "token": "emailed-reset-token",
            "password": "new-secret-1",
            "password_confirmation": "new-secret-1"
        }))
    };

    let response = reset().await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Password has been reset successfully"
    );

    server
        .post("/api/auth/login")
        .json(&json!({ "email": "amina@example.com", "password": "new-secret-1" }))
        .await
        .assert_status_ok();
    server
        .post("/api/auth/login")
        .json(&json!({ "email": "amina@example.com", "password": common::PASSWORD }))
        .await
        .assert_status_unauthorized();

    // Tokens are single use.
    reset().await.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_reset_password_rejects_bad_token(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    common::register_seeker(&server, "amina@example.com").await;

    server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "amina@example.com" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/auth/reset-password")
        .json(&json!({
            "email": "amina@example.com",
            "token": "guessed-token",
            "password": "new-secret-1",
            "password_confirmation": "new-secret-1"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Invalid or expired reset token"
    );
}

#[sqlx::test]
async fn test_send_otp_and_verify_phone(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": "Amina",
            "last_name": "Otieno",
            "email": "amina@example.com",
            "phone": "+254700000001",
            "password": "secret123",
            "password_confirmation": "secret123",
            "role": "job-seeker"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/auth/send-otp")
        .json(&json!({ "phone": "+254700000001" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["expires_in"], 600);

    let wrong = server
        .post("/api/auth/verify-phone")
        .json(&json!({ "phone": "+254700000001", "otp": "000000" }))
        .await;
    assert!(wrong.status_code().is_client_error());

    let sms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sms_logs WHERE to_phone = $1")
        .bind("+254700000001")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sms, 1);
}
