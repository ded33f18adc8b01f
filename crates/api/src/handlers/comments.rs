//! Handlers for the admin `/admin/comments` moderation queue.
//!
//! Status changes and deletes go through [`CommentRepo`], which keeps each
//! article's `comment_count` equal to its number of approved comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matuto_core::error::CoreError;
use matuto_core::moderation::{validate_batch_ids, CommentStatus};
use matuto_core::types::DbId;
use matuto_db::models::comment::{BatchCommentStatus, CommentQuery, UpdateCommentStatus};
use matuto_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{AffectedResponse, DataResponse};
use crate::state::AppState;

/// GET /api/v1/admin/comments
///
/// Paged list filtered by status, article, and keyword.
pub async fn list_comments(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CommentQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.page_request().validate()?;
    if let Some(status) = params.status {
        CommentStatus::try_from(status)?;
    }

    let page = CommentRepo::list_page(&state.pool, &params, pagination).await?;
    Ok(Json(DataResponse { data: page }))
}

/// PATCH /api/v1/admin/comments/{id}/status
///
/// Move one comment to `pending` (0), `approved` (1), or `rejected` (2).
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCommentStatus>,
) -> AppResult<impl IntoResponse> {
    let status = CommentStatus::try_from(input.status)?;

    let comment = CommentRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    tracing::info!(
        comment_id = id,
        article_id = comment.article_id,
        status = %status,
        user_id = auth.user_id,
        "Comment status changed",
    );

    Ok(Json(DataResponse { data: comment }))
}

/// POST /api/v1/admin/comments/batch-status
///
/// Apply one status to many comments. Unknown ids are skipped; the response
/// reports how many comments were updated.
pub async fn batch_update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BatchCommentStatus>,
) -> AppResult<impl IntoResponse> {
    let status = CommentStatus::try_from(input.status)?;
    let ids = validate_batch_ids(&input.ids)?;

    let affected = CommentRepo::batch_update_status(&state.pool, &ids, status).await?;

    tracing::info!(
        requested = ids.len(),
        affected,
        status = %status,
        user_id = auth.user_id,
        "Comment statuses changed in batch",
    );

    Ok(Json(DataResponse {
        data: AffectedResponse { affected },
    }))
}

/// DELETE /api/v1/admin/comments/{id}
///
/// Deletes the comment and every reply beneath it.
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = CommentRepo::delete(&state.pool, id).await?;
    if removed == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }));
    }

    tracing::info!(comment_id = id, removed, user_id = auth.user_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
