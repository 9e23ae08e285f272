mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

#[sqlx::test]
async fn test_list_companies_with_search(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;
    common::register_employer(&server, "hr@zuri.co.ke", "Zuri Health").await;

    let all = server.get("/api/companies").await;
    all.assert_status_ok();
    assert_eq!(all.json::<Value>()["pagination"]["total"], 2);

    let found = server
        .get("/api/companies")
        .add_query_param("search", "zuri")
        .await;
    found.assert_status_ok();
    let body = found.json::<Value>();
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["companies"][0]["name"], "Zuri Health");
}

#[sqlx::test]
async fn test_show_company_by_id_and_slug(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;

    let by_slug = server.get("/api/companies/acme-ltd").await;
    by_slug.assert_status_ok();
    let company = by_slug.json::<Value>()["company"].clone();
    assert_eq!(company["name"], "Acme Ltd");

    let id = company["id"].as_i64().unwrap();
    let by_id = server.get(&format!("/api/companies/{id}")).await;
    by_id.assert_status_ok();
    assert_eq!(by_id.json::<Value>()["company"]["slug"], "acme-ltd");

    server
        .get("/api/companies/no-such-company")
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_same_name_companies_get_distinct_slugs(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;
    common::register_employer(&server, "jobs@acme.com", "Acme Ltd").await;

    server.get("/api/companies/acme-ltd").await.assert_status_ok();
    server.get("/api/companies/acme-ltd-1").await.assert_status_ok();
}

#[sqlx::test]
async fn test_inactive_company_hidden(pool: PgPool) {
    let (server, _rx) = common::api_server(pool.clone());
    common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;

    sqlx::query("UPDATE companies SET is_active = FALSE")
        .execute(&pool)
        .await
        .unwrap();

    server
        .get("/api/companies/acme-ltd")
        .await
        .assert_status_not_found();
    let list = server.get("/api/companies").await;
    assert_eq!(list.json::<Value>()["pagination"]["total"], 0);
}

#[sqlx::test]
async fn test_company_jobs_lists_open_postings_only(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    let token = common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;
    let open = common::create_active_job(&server, &token, "Backend Engineer").await;
    common::create_job(&server, &token, "Unpublished Role").await;

    let response = server.get("/api/companies/acme-ltd/jobs").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["company"]["name"], "Acme Ltd");
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["id"], open);
}

#[sqlx::test]
async fn test_my_company_and_update(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    let token = common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;

    let mine = server
        .get("/api/employer/company")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;
    mine.assert_status_ok();
    assert_eq!(mine.json::<Value>()["company"]["name"], "Acme Ltd");

    let updated = server
        .put("/api/employer/company")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "name": "Acme Kenya Ltd",
            "website": "https://acme.co.ke",
            "email": "Careers@Acme.co.ke"
        }))
        .await;
    updated.assert_status_ok();
    let company = &updated.json::<Value>()["company"];
    assert_eq!(company["name"], "Acme Kenya Ltd");
    assert_eq!(company["website"], "https://acme.co.ke");
    assert_eq!(company["email"], "careers@acme.co.ke");
    assert_eq!(company["slug"], "acme-ltd");
}

#[sqlx::test]
async fn test_update_company_validation(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    let token = common::register_employer(&server, "hr@acme.co.ke", "Acme Ltd").await;

    let bad_url = server
        .put("/api/employer/company")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "website": "not a url" }))
        .await;
    bad_url.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(bad_url.json::<Value>()["error"]["details"]["website"].is_array());

    let bad_industry = server
        .put("/api/employer/company")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "industry_id": 9_999 }))
        .await;
    bad_industry.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(bad_industry.json::<Value>()["error"]["details"]["industry_id"].is_array());
}

#[sqlx::test]
async fn test_job_seeker_has_no_company_endpoints(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);
    let token = common::register_seeker(&server, "amina@example.com").await;

    server
        .get("/api/employer/company")
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
