//! HTTP-level tests for the admin article endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create(app: axum::Router, token: &str, path: &str, body: Value) -> Value {
    let response = post_json_auth(app, path, body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_i64().expect("id"))
        .collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_article_with_associations(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let rust = create(test_app.app(), &token, "/api/v1/admin/categories", json!({ "name": "Rust" })).await;
    let web = create(test_app.app(), &token, "/api/v1/admin/categories", json!({ "name": "Web" })).await;
    let tag = create(test_app.app(), &token, "/api/v1/admin/tags", json!({ "name": "axum" })).await;

    let body = json!({
        "title": "Hello World",
        "content": "# Hi",
        "status": 1,
        "category_ids": [web["id"], rust["id"], web["id"]],
        "tag_ids": [tag["id"]],
        "add_tags": ["sqlx"],
    });
    let article = create(test_app.app(), &token, "/api/v1/admin/articles", body).await;

    assert_eq!(article["slug"], "hello-world");
    assert_eq!(article["content_model"], "markdown");
    assert_eq!(article["article_type"], "article");
    assert_eq!(article["comment_count"], 0);
    assert!(article["published_at"].is_string(), "published articles get a timestamp");

    let mut expected = vec![rust["id"].as_i64().unwrap(), web["id"].as_i64().unwrap()];
    expected.sort_unstable();
    assert_eq!(ids(&article["category_ids"]), expected);
    assert_eq!(ids(&article["tag_ids"]).len(), 2, "explicit tag plus the named one");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_draft_has_no_published_at(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let body = json!({ "title": "Draft", "content": "wip", "slug": "custom-slug" });
    let article = create(test_app.app(), &token, "/api/v1/admin/articles", body).await;

    assert_eq!(article["status"], 0);
    assert_eq!(article["slug"], "custom-slug");
    assert!(article["published_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_unknown_category(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let body = json!({ "title": "T", "content": "c", "category_ids": [999] });
    let response = post_json_auth(test_app.app(), "/api/v1/admin/articles", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("999"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "nothing is written when validation fails");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_bad_fields(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    for body in [
        json!({ "title": "  ", "content": "c" }),
        json!({ "title": "T", "content": "" }),
        json!({ "title": "T", "content": "c", "status": 5 }),
        json!({ "title": "T", "content": "c", "content_model": "rtf" }),
        json!({ "title": "T", "content": "c", "tag_ids": [0] }),
    ] {
        let response =
            post_json_auth(test_app.app(), "/api/v1/admin/articles", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_association_sets(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let a = create(test_app.app(), &token, "/api/v1/admin/categories", json!({ "name": "A" })).await;
    let b = create(test_app.app(), &token, "/api/v1/admin/categories", json!({ "name": "B" })).await;
    let article = create(
        test_app.app(),
        &token,
        "/api/v1/admin/articles",
        json!({ "title": "T", "content": "c", "category_ids": [a["id"]], "add_tags": ["x"] }),
    )
    .await;
    let id = article["id"].as_i64().unwrap();

    let response = put_json_auth(
        test_app.app(),
        &format!("/api/v1/admin/articles/{id}"),
        json!({ "title": "Renamed", "category_ids": [b["id"]] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Renamed");
    assert_eq!(json["data"]["content"], "c", "absent fields are unchanged");
    assert_eq!(ids(&json["data"]["category_ids"]), vec![b["id"].as_i64().unwrap()]);
    assert!(ids(&json["data"]["tag_ids"]).is_empty(), "omitted tag set is cleared");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM article_categories WHERE article_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1, "no stale join rows remain");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_unknown_article_is_404(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let response = put_json_auth(
        test_app.app(),
        "/api/v1/admin/articles/4242",
        json!({ "title": "x" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_article(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    let article = create(
        test_app.app(),
        &token,
        "/api/v1/admin/articles",
        json!({ "title": "Bye", "content": "c", "add_tags": ["gone"] }),
    )
    .await;
    let uri = format!("/api/v1/admin/articles/{}", article["id"]);

    let response = delete_auth(test_app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(test_app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(test_app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_pagination_and_filters(pool: PgPool) {
    let test_app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, &test_app).await;

    for (title, status) in [("Alpha", 1), ("Beta", 0), ("Alphabet", 1)] {
        create(
            test_app.app(),
            &token,
            "/api/v1/admin/articles",
            json!({ "title": title, "content": "c", "status": status }),
        )
        .await;
    }

    let response = get_auth(test_app.app(), "/api/v1/admin/articles?page=1&page_size=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["pages"], 2);
    assert!(json["data"]["items"][0].get("content").is_none(), "lists omit the body");

    let response = get_auth(test_app.app(), "/api/v1/admin/articles?title=alpha&status=1", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);

    let response = get_auth(test_app.app(), "/api/v1/admin/articles?page=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
