pub mod articles;
pub mod attachments;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod public;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user (requires auth)
///
/// /public/articles                                 published articles, paged
/// /public/articles/{id}                            article + approved comments
/// /public/categories                               active category tree
/// /public/tags                                     tags with usage counts
/// /public/comments                                 submit comment (POST)
///
/// /admin/articles                                  list, create
/// /admin/articles/{id}                             get, update, delete
///
/// /admin/categories                                list, create
/// /admin/categories/tree                           full category tree
/// /admin/categories/{id}                           get, update, delete
///
/// /admin/tags                                      list, create
/// /admin/tags/{id}                                 get, update, delete
///
/// /admin/comments                                  moderation queue
/// /admin/comments/{id}/status                      change status (PATCH)
/// /admin/comments/batch-status                     change many (POST)
/// /admin/comments/{id}                             delete with replies
///
/// /admin/attachments                               list, upload (multipart)
/// /admin/attachments/{id}                          get, delete
/// /admin/attachments/batch-delete                  delete many (POST)
/// ```
///
/// Every `/admin` handler takes an [`AuthUser`](crate::middleware::auth::AuthUser),
/// so those routes require a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Visitor-facing reads and comment submission.
        .nest("/public", public::router())
        // Content management.
        .nest("/admin/articles", articles::router())
        .nest("/admin/categories", categories::router())
        .nest("/admin/tags", tags::router())
        // Moderation.
        .nest("/admin/comments", comments::router())
        // Uploads.
        .nest("/admin/attachments", attachments::router())
}
