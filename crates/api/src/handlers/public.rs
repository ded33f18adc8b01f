//! Handlers for the unauthenticated `/public` resources read by the blog
//! front end.
//!
//! Only published articles and active categories are visible here, and
//! comments are limited to approved ones without email, IP, or user agent.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matuto_core::comment::{build_threads, validate_submission, Thread};
use matuto_core::error::CoreError;
use matuto_core::tree::build_nested;
use matuto_core::types::DbId;
use matuto_db::models::article::{ArticleDetail, PublicArticleQuery};
use matuto_db::models::comment::{CreateComment, PublicComment};
use matuto_db::repositories::{ArticleRepo, CategoryRepo, CommentRepo, TagRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::client::RequestClient;
use crate::response::DataResponse;
use crate::state::AppState;

/// A published article with its approved comment threads.
#[derive(Debug, Serialize)]
pub struct PublicArticle {
    #[serde(flatten)]
    pub article: ArticleDetail,
    pub comments: Vec<Thread<PublicComment>>,
}

/// GET /api/v1/public/articles
///
/// Published articles, pinned first, filtered by keyword, category, and tag.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<PublicArticleQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.page_request().validate()?;
    let page = ArticleRepo::list_public_page(&state.pool, &params, pagination).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/public/articles/{id}
///
/// Counts a view and returns the article with its approved comments.
/// Drafts are reported as not found.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut article = ArticleRepo::find_published(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;

    ArticleRepo::increment_views(&state.pool, id).await?;
    article.view_count += 1;

    let article = ArticleRepo::with_associations(&state.pool, article).await?;
    let approved = CommentRepo::list_approved(&state.pool, id).await?;
    let comments = build_threads(approved, PublicComment::thread_key);

    Ok(Json(DataResponse {
        data: PublicArticle { article, comments },
    }))
}

/// GET /api/v1/public/categories
///
/// Active categories nested by parent. A category below a disabled parent
/// is shown at the root.
pub async fn category_tree(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_all(&state.pool, true).await?;
    let tree = build_nested(categories, |c| (c.id, c.parent_id));
    Ok(Json(DataResponse { data: tree }))
}

/// GET /api/v1/public/tags
///
/// Every tag with the number of published articles using it.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_with_usage(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/public/comments
///
/// Submit a comment or a reply. New comments wait in `pending` until an
/// administrator approves them.
pub async fn submit_comment(
    State(state): State<AppState>,
    RequestClient(client): RequestClient,
    Json(mut input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_submission(&input.author, input.email.as_deref(), &input.content)?;

    let article = ArticleRepo::find_published(&state.pool, input.article_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id: input.article_id,
        }))?;
    if !article.is_comment {
        return Err(AppError::Core(CoreError::Forbidden(
            "Comments are closed for this article".into(),
        )));
    }

    input.parent_id = input.parent_id.filter(|id| *id > 0);
    let top_parent_id = match input.parent_id {
        Some(parent_id) => {
            let parent = CommentRepo::find_parent(&state.pool, parent_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "Parent comment {parent_id} does not exist"
                    )))
                })?;
            Some(parent.thread_root_for(article.id)?)
        }
        None => None,
    };

    let comment = CommentRepo::create(&state.pool, &input, top_parent_id, &client).await?;

    tracing::info!(
        comment_id = comment.id,
        article_id = article.id,
        parent_id = ?comment.parent_id,
        ip = ?client.ip,
        "Comment submitted",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PublicComment::from(comment),
        }),
    ))
}
