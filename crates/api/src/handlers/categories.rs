//! Handlers for the admin `/admin/categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matuto_core::category::{delete_blocker, normalize_parent, validate_category_name, CategoryStatus};
use matuto_core::error::CoreError;
use matuto_core::slug::{generate_slug, resolve_slug};
use matuto_core::tree::build_nested;
use matuto_core::types::DbId;
use matuto_db::models::category::{CategoryQuery, CreateCategory, UpdateCategory};
use matuto_db::repositories::CategoryRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/categories
///
/// Paged list filtered by name and status.
pub async fn list_categories(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.page_request().validate()?;
    if let Some(status) = params.status {
        CategoryStatus::try_from(status)?;
    }

    let page = CategoryRepo::list_page(&state.pool, &params, pagination).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/admin/categories/tree
///
/// Every category, active or not, nested under its parent.
pub async fn category_tree(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_all(&state.pool, false).await?;
    let tree = build_nested(categories, |c| (c.id, c.parent_id));
    Ok(Json(DataResponse { data: tree }))
}

/// GET /api/v1/admin/categories/{id}
pub async fn get_category(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/admin/categories
///
/// A missing or non-positive `parent_id` creates a root category.
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_category_name(&input.name)?;
    if let Some(status) = input.status {
        CategoryStatus::try_from(status)?;
    }
    if let Some(parent_id) = normalize_parent(input.parent_id) {
        ensure_parent_exists(&state.pool, parent_id).await?;
    }

    input.slug = Some(resolve_slug(input.slug.as_deref(), &input.name));

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        category_id = category.id,
        parent_id = ?category.parent_id,
        user_id = auth.user_id,
        "Category created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/admin/categories/{id}
///
/// Moving a category below itself or one of its descendants is rejected.
pub async fn update_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_category_name(name)?;
    }
    if let Some(status) = input.status {
        CategoryStatus::try_from(status)?;
    }

    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    if let Some(parent_id) = normalize_parent(input.parent_id) {
        ensure_parent_exists(&state.pool, parent_id).await?;
    }

    if input.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
        input.slug = input.name.as_deref().map(generate_slug);
    }

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    tracing::info!(category_id = id, user_id = auth.user_id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// Returns 409 while the category has child categories or articles.
pub async fn delete_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    let child_count = CategoryRepo::child_count(&state.pool, id).await?;
    let article_count = CategoryRepo::article_count(&state.pool, id).await?;
    if let Some(blocker) = delete_blocker(child_count, article_count) {
        return Err(blocker.into());
    }

    CategoryRepo::delete(&state.pool, id).await?;

    tracing::info!(category_id = id, user_id = auth.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_parent_exists(pool: &PgPool, parent_id: DbId) -> AppResult<()> {
    if CategoryRepo::find_by_id(pool, parent_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Parent category {parent_id} does not exist"
        ))));
    }
    Ok(())
}
