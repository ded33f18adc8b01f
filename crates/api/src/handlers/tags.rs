//! Handlers for the admin `/admin/tags` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matuto_core::error::CoreError;
use matuto_core::slug::{generate_slug, resolve_slug};
use matuto_core::tag::{delete_blocker, resolve_color, validate_color, validate_tag_name};
use matuto_core::types::DbId;
use matuto_db::models::tag::{CreateTag, TagQuery, UpdateTag};
use matuto_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/tags
pub async fn list_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TagQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.page_request().validate()?;
    let page = TagRepo::list_page(&state.pool, &params, pagination).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/admin/tags/{id}
pub async fn get_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;
    Ok(Json(DataResponse { data: tag }))
}

/// POST /api/v1/admin/tags
///
/// Names are unique; a duplicate name returns 409.
pub async fn create_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    validate_tag_name(&input.name)?;
    input.color = Some(resolve_color(input.color.as_deref())?);
    input.slug = Some(resolve_slug(input.slug.as_deref(), &input.name));

    let tag = TagRepo::create(&state.pool, &input).await?;

    tracing::info!(tag_id = tag.id, user_id = auth.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// PUT /api/v1/admin/tags/{id}
pub async fn update_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(tag_id): Path<DbId>,
    Json(mut input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_tag_name(name)?;
    }
    if let Some(color) = &input.color {
        validate_color(color.trim())?;
        input.color = Some(color.trim().to_string());
    }
    if input.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
        input.slug = input.name.as_deref().map(generate_slug);
    }

    let tag = TagRepo::update(&state.pool, tag_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag_id,
        }))?;

    tracing::info!(tag_id, user_id = auth.user_id, "Tag updated");

    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/admin/tags/{id}
///
/// Returns 409 while any article still carries the tag.
pub async fn delete_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(tag_id): Path<DbId>,
) -> AppResult<StatusCode> {
    TagRepo::find_by_id(&state.pool, tag_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag_id,
        }))?;

    let article_count = TagRepo::article_count(&state.pool, tag_id).await?;
    if let Some(blocker) = delete_blocker(article_count) {
        return Err(blocker.into());
    }

    TagRepo::delete(&state.pool, tag_id).await?;

    tracing::info!(tag_id, user_id = auth.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
