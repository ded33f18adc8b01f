//! Route definitions for the admin `/admin/comments` moderation queue.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/admin/comments`.
///
/// ```text
/// GET    /              -> list_comments
/// PATCH  /{id}/status   -> update_status
/// POST   /batch-status  -> batch_update_status
/// DELETE /{id}          -> delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list_comments))
        .route("/{id}/status", patch(comments::update_status))
        .route("/batch-status", post(comments::batch_update_status))
        .route("/{id}", delete(comments::delete_comment))
}
