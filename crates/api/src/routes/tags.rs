//! Route definitions for the admin `/admin/tags` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/admin/tags`.
///
/// ```text
/// GET    /      -> list_tags
/// POST   /      -> create_tag
/// GET    /{id}  -> get_tag
/// PUT    /{id}  -> update_tag
/// DELETE /{id}  -> delete_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/{id}",
            get(tags::get_tag).put(tags::update_tag).delete(tags::delete_tag),
        )
}
