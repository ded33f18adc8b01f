//! Handlers for the admin `/admin/articles` resource.
//!
//! Create and update validate every referenced category and tag id before
//! the repository writes the article and its join rows in one transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matuto_core::article::{
    missing_ids, normalize_ids, validate_article_type, validate_content, validate_content_model,
    validate_title, ArticleStatus,
};
use matuto_core::error::CoreError;
use matuto_core::slug::{generate_slug, resolve_slug};
use matuto_core::tag::validate_tag_name;
use matuto_core::types::DbId;
use matuto_db::models::article::{ArticleQuery, CreateArticle, UpdateArticle};
use matuto_db::repositories::{ArticleRepo, CategoryRepo, TagRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/articles
///
/// Paged list filtered by title, status, category, and tag.
pub async fn list_articles(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ArticleQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.page_request().validate()?;
    if let Some(status) = params.status {
        ArticleStatus::try_from(status)?;
    }

    let page = ArticleRepo::list_page(&state.pool, &params, pagination).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/admin/articles/{id}
pub async fn get_article(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ArticleRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;
    Ok(Json(DataResponse { data: article }))
}

/// POST /api/v1/admin/articles
///
/// Create an article with its categories and tags. The slug is generated
/// from the title when omitted.
pub async fn create_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_content(&input.content)?;
    validate_options(
        input.content_model.as_deref(),
        input.article_type.as_deref(),
        input.status,
        &input.add_tags,
    )?;
    input.category_ids = normalize_ids("category_ids", &input.category_ids)?;
    input.tag_ids = normalize_ids("tag_ids", &input.tag_ids)?;
    ensure_associations_exist(&state.pool, &input.category_ids, &input.tag_ids).await?;

    input.slug = Some(resolve_slug(input.slug.as_deref(), &input.title));

    let article = ArticleRepo::create(&state.pool, &input, Some(auth.user_id)).await?;

    tracing::info!(
        article_id = article.article.id,
        user_id = auth.user_id,
        categories = article.category_ids.len(),
        tags = article.tag_ids.len(),
        "Article created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}

/// PUT /api/v1/admin/articles/{id}
///
/// Update scalar fields that are present and replace the category and tag
/// sets with the ones supplied (an omitted set clears the associations).
pub async fn update_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateArticle>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    validate_options(
        input.content_model.as_deref(),
        input.article_type.as_deref(),
        input.status,
        &input.add_tags,
    )?;
    input.category_ids = normalize_ids("category_ids", &input.category_ids)?;
    input.tag_ids = normalize_ids("tag_ids", &input.tag_ids)?;
    ensure_associations_exist(&state.pool, &input.category_ids, &input.tag_ids).await?;

    // A blank slug is regenerated from the new title, or left alone.
    if input.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
        input.slug = input.title.as_deref().map(generate_slug);
    }

    let article = ArticleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;

    tracing::info!(article_id = id, user_id = auth.user_id, "Article updated");

    Ok(Json(DataResponse { data: article }))
}

/// DELETE /api/v1/admin/articles/{id}
///
/// Removes the article together with its join rows and comments.
pub async fn delete_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ArticleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }));
    }

    tracing::info!(article_id = id, user_id = auth.user_id, "Article deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_options(
    content_model: Option<&str>,
    article_type: Option<&str>,
    status: Option<i16>,
    add_tags: &[String],
) -> Result<(), CoreError> {
    if let Some(model) = content_model {
        validate_content_model(model)?;
    }
    if let Some(kind) = article_type {
        validate_article_type(kind)?;
    }
    if let Some(status) = status {
        ArticleStatus::try_from(status)?;
    }
    for name in add_tags.iter().filter(|n| !n.trim().is_empty()) {
        validate_tag_name(name)?;
    }
    Ok(())
}

/// Reject category or tag ids that do not exist.
async fn ensure_associations_exist(
    pool: &PgPool,
    category_ids: &[DbId],
    tag_ids: &[DbId],
) -> AppResult<()> {
    let existing = CategoryRepo::existing_ids(pool, category_ids).await?;
    let missing = missing_ids(category_ids, &existing);
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown category ids: {missing:?}"
        ))));
    }

    let existing = TagRepo::existing_ids(pool, tag_ids).await?;
    let missing = missing_ids(tag_ids, &existing);
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown tag ids: {missing:?}"
        ))));
    }
    Ok(())
}
