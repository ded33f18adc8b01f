//! HTTP-level tests for the admin tag endpoints and the public tag list.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_tag_defaults(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let response = post_json_auth(
        test_app.app(),
        "/api/v1/admin/tags",
        json!({ "name": "Async Rust" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["color"], "#007bff");
    assert_eq!(json["data"]["slug"], "async-rust");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_name_conflicts(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let body = json!({ "name": "rust" });
    let first = post_json_auth(test_app.app(), "/api/v1/admin/tags", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(test_app.app(), "/api/v1/admin/tags", body, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_color_rejected(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let response = post_json_auth(
        test_app.app(),
        "/api/v1/admin/tags",
        json!({ "name": "x", "color": "blue" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_tag(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let created = post_json_auth(test_app.app(), "/api/v1/admin/tags", json!({ "name": "old" }), &token).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        test_app.app(),
        &format!("/api/v1/admin/tags/{id}"),
        json!({ "color": "#abc" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["color"], "#abc");
    assert_eq!(json["data"]["name"], "old");

    let response = put_json_auth(
        test_app.app(),
        "/api/v1/admin/tags/999",
        json!({ "name": "nobody" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_tag_in_use_conflicts(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let article = post_json_auth(
        test_app.app(),
        "/api/v1/admin/articles",
        json!({ "title": "T", "content": "c", "add_tags": ["busy"] }),
        &token,
    )
    .await;
    let tag_id = body_json(article).await["data"]["tag_ids"][0].as_i64().unwrap();

    let response = delete_auth(test_app.app(), &format!("/api/v1/admin/tags/{tag_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let free = post_json_auth(test_app.app(), "/api/v1/admin/tags", json!({ "name": "free" }), &token).await;
    let free_id = body_json(free).await["data"]["id"].as_i64().unwrap();
    let response = delete_auth(test_app.app(), &format!("/api/v1/admin/tags/{free_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_tags_count_published_articles(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    for status in [1, 1, 0] {
        let response = post_json_auth(
            test_app.app(),
            "/api/v1/admin/articles",
            json!({ "title": "T", "content": "c", "status": status, "add_tags": ["rust"] }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(test_app.app(), "/api/v1/public/tags").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["name"], "rust");
    assert_eq!(json["data"][0]["article_count"], 2, "drafts are not counted");
}
