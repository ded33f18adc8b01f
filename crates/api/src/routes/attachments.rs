//! Route definitions for the admin `/admin/attachments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::attachments;
use crate::state::AppState;

/// Routes mounted at `/admin/attachments`.
///
/// ```text
/// GET    /              -> list_attachments
/// POST   /              -> upload_attachment (multipart)
/// GET    /{id}          -> get_attachment
/// DELETE /{id}          -> delete_attachment
/// POST   /batch-delete  -> batch_delete_attachments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(attachments::list_attachments).post(attachments::upload_attachment),
        )
        .route(
            "/{id}",
            get(attachments::get_attachment).delete(attachments::delete_attachment),
        )
        .route("/batch-delete", post(attachments::batch_delete_attachments))
}
