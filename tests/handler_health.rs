mod common;

use serde_json::Value;
use sqlx::PgPool;

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["analytics_queue"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json["version"].is_string());
}

#[sqlx::test]
async fn test_health_degraded_when_queue_closed(pool: PgPool) {
    let (server, rx) = common::api_server(pool);
    drop(rx);

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["analytics_queue"]["status"], "error");
}

#[sqlx::test]
async fn test_unknown_api_route_is_json_404(pool: PgPool) {
    let (server, _rx) = common::api_server(pool);

    let response = server.get("/api/nope").await;

    response.assert_status_not_found();
    let json = response.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["path"], "/api/nope");
}
