//! HTTP-level tests for the root health endpoint and shared middleware.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let test_app = common::build_test_app(pool);

    let response = get(test_app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_responses_carry_request_id(pool: PgPool) {
    let test_app = common::build_test_app(pool);

    let response = get(test_app.app(), "/health").await;
    assert!(
        response.headers().contains_key("x-request-id"),
        "request id must be propagated to the response"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let test_app = common::build_test_app(pool);

    let response = get(test_app.app(), "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
