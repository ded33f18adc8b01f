#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use matuto_api::auth::jwt::{generate_access_token, JwtConfig};
use matuto_api::auth::password::hash_password;
use matuto_api::config::{ServerConfig, StorageConfig};
use matuto_api::router::build_app_router;
use matuto_api::state::AppState;
use matuto_db::models::user::{CreateUser, User};
use matuto_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "test_password_123!";
pub const BASE_URL: &str = "http://localhost:8080/uploads/";

/// The application under test plus the temporary storage root it writes to.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub storage: TempDir,
}

impl TestApp {
    /// A fresh handle to the router (`oneshot` consumes it).
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults, storing uploads in `storage_root`.
pub fn test_config(storage_root: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
            issuer: "matuto-blog".to_string(),
        },
        storage: StorageConfig {
            base_path: storage_root.path().to_path_buf(),
            base_url: BASE_URL.to_string(),
            max_size_bytes: 1024 * 1024,
        },
        admin_bootstrap: None,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let storage = tempfile::tempdir().expect("temp storage dir");
    let config = test_config(&storage);
    let state = AppState::new(pool, config.clone());
    let router = build_app_router(state, &config);
    TestApp {
        router,
        config,
        storage,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create an administrator directly in the database.
pub async fn create_user(pool: &PgPool, account: &str) -> User {
    let input = CreateUser {
        account: account.to_string(),
        username: account.to_string(),
        email: Some(format!("{account}@example.com")),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Create an administrator and mint a Bearer token for them.
pub async fn admin_token(pool: &PgPool, test_app: &TestApp) -> String {
    let user = create_user(pool, "admin").await;
    generate_access_token(user.id, &user.account, &test_app.config.jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, json_request("GET", uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("POST", uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("PUT", uri, Some(token), Some(body))).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("PATCH", uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, json_request("DELETE", uri, Some(token), None)).await
}

/// POST a multipart form with one `file` part and optional text fields.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    file: (&str, &str, &[u8]),
    fields: &[(&str, &str)],
    token: &str,
) -> Response {
    const BOUNDARY: &str = "----matuto-test-boundary";
    let (filename, content_type, data) = file;

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("valid request");
    send(app, request).await
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status code");
}
