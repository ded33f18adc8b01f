//! Route definitions for the unauthenticated `/public` resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET  /articles       -> list_articles
/// GET  /articles/{id}  -> get_article
/// GET  /categories     -> category_tree
/// GET  /tags           -> list_tags
/// POST /comments       -> submit_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/articles", get(public::list_articles))
        .route("/articles/{id}", get(public::get_article))
        .route("/categories", get(public::category_tree))
        .route("/tags", get(public::list_tags))
        .route("/comments", post(public::submit_comment))
}
