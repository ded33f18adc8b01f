//! Repository for the `articles`, `article_categories`, and `article_tags`
//! tables.
//!
//! Every write that touches an article's associations runs in a single
//! transaction: the article row and its join rows commit together or not
//! at all.

use std::collections::BTreeSet;

use chrono::Utc;
use matuto_core::article::{resolve_published_at, ArticleStatus};
use matuto_core::pagination::{search_term, Page, Pagination};
use matuto_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::article::{
    Article, ArticleDetail, ArticleQuery, ArticleSummary, CreateArticle, PublicArticleQuery,
    UpdateArticle,
};
use crate::repositories::TagRepo;

/// Column list for the `articles` table.
const COLUMNS: &str = "id, author_id, title, slug, summary, content, content_model, \
    article_type, thumbnail, meta_keywords, meta_description, status, is_top, is_comment, \
    view_count, comment_count, published_at, created_at, updated_at";

/// Column list for [`ArticleSummary`].
const SUMMARY_COLUMNS: &str = "id, title, slug, summary, article_type, thumbnail, status, \
    is_top, is_comment, view_count, comment_count, published_at, created_at, updated_at";

/// Shared WHERE clause of the admin list: title, status, category, tag.
const ADMIN_FILTER: &str = "($1::TEXT IS NULL OR title ILIKE $1)
      AND ($2::SMALLINT IS NULL OR status = $2)
      AND ($3::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM article_categories ac
            WHERE ac.article_id = articles.id AND ac.category_id = $3))
      AND ($4::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM article_tags atg
            WHERE atg.article_id = articles.id AND atg.tag_id = $4))";

/// Shared WHERE clause of the public list: published only, keyword over
/// title and content, category, tag.
const PUBLIC_FILTER: &str = "status = 1
      AND ($1::TEXT IS NULL OR title ILIKE $1 OR content ILIKE $1)
      AND ($2::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM article_categories ac
            WHERE ac.article_id = articles.id AND ac.category_id = $2))
      AND ($3::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM article_tags atg
            WHERE atg.article_id = articles.id AND atg.tag_id = $3))";

/// Pinned first, then newest.
const LIST_ORDER: &str = "is_top DESC, created_at DESC, id DESC";

/// Provides CRUD operations for articles and their associations.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert an article together with its category and tag rows.
    ///
    /// `add_tags` names are resolved (or created) inside the same
    /// transaction and merged into the tag set.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        author_id: Option<DbId>,
    ) -> Result<ArticleDetail, sqlx::Error> {
        let status = input.status.unwrap_or(ArticleStatus::Draft.id());
        let published_at =
            resolve_published_at(None, ArticleStatus::try_from(status).unwrap_or_default(), Utc::now());

        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO articles
                (author_id, title, slug, summary, content, content_model, article_type,
                 thumbnail, meta_keywords, meta_description, status, is_top, is_comment,
                 published_at)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, COALESCE($6, 'markdown'),
                     COALESCE($7, 'article'), $8, $9, $10, $11, COALESCE($12, false),
                     COALESCE($13, true), $14)
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&insert_query)
            .bind(author_id)
            .bind(input.title.trim())
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.content_model)
            .bind(&input.article_type)
            .bind(&input.thumbnail)
            .bind(&input.meta_keywords)
            .bind(&input.meta_description)
            .bind(status)
            .bind(input.is_top)
            .bind(input.is_comment)
            .bind(published_at)
            .fetch_one(&mut *tx)
            .await?;

        let tag_ids = Self::resolve_tags_inner(&mut tx, &input.tag_ids, &input.add_tags).await?;
        let category_ids = Self::set_categories_inner(&mut tx, article.id, &input.category_ids).await?;
        let tag_ids = Self::set_tags_inner(&mut tx, article.id, &tag_ids).await?;

        tx.commit().await?;
        Ok(ArticleDetail {
            article,
            category_ids,
            tag_ids,
        })
    }

    /// Find an article by ID regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published article by ID.
    pub async fn find_published(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1 AND status = 1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an article with its category and tag ids.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ArticleDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(article) => Ok(Some(Self::with_associations(pool, article).await?)),
            None => Ok(None),
        }
    }

    /// Attach the category and tag ids of an already loaded article.
    pub async fn with_associations(
        pool: &PgPool,
        article: Article,
    ) -> Result<ArticleDetail, sqlx::Error> {
        let category_ids = Self::category_ids(pool, article.id).await?;
        let tag_ids = Self::tag_ids(pool, article.id).await?;
        Ok(ArticleDetail {
            article,
            category_ids,
            tag_ids,
        })
    }

    /// One page of the admin article list.
    pub async fn list_page(
        pool: &PgPool,
        params: &ArticleQuery,
        pagination: Pagination,
    ) -> Result<Page<ArticleSummary>, sqlx::Error> {
        let title = search_term(params.title.as_deref());

        let count_query = format!("SELECT COUNT(*) FROM articles WHERE {ADMIN_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&title)
            .bind(params.status)
            .bind(params.category_id)
            .bind(params.tag_id)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM articles WHERE {ADMIN_FILTER}
             ORDER BY {LIST_ORDER}
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(&title)
            .bind(params.status)
            .bind(params.category_id)
            .bind(params.tag_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, pagination))
    }

    /// One page of published articles for visitors.
    pub async fn list_public_page(
        pool: &PgPool,
        params: &PublicArticleQuery,
        pagination: Pagination,
    ) -> Result<Page<ArticleSummary>, sqlx::Error> {
        let keyword = search_term(params.keyword.as_deref());

        let count_query = format!("SELECT COUNT(*) FROM articles WHERE {PUBLIC_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&keyword)
            .bind(params.category_id)
            .bind(params.tag_id)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM articles WHERE {PUBLIC_FILTER}
             ORDER BY {LIST_ORDER}
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, ArticleSummary>(&query)
            .bind(&keyword)
            .bind(params.category_id)
            .bind(params.tag_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, pagination))
    }

    /// Update an article and replace its category and tag sets.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
    ) -> Result<Option<ArticleDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(i16, Option<Timestamp>)> =
            sqlx::query_as("SELECT status, published_at FROM articles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((current_status, current_published_at)) = current else {
            return Ok(None);
        };

        let status = input.status.unwrap_or(current_status);
        let published_at = resolve_published_at(
            current_published_at,
            ArticleStatus::try_from(status).unwrap_or_default(),
            Utc::now(),
        );

        let update_query = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                summary = COALESCE($4, summary),
                content = COALESCE($5, content),
                content_model = COALESCE($6, content_model),
                article_type = COALESCE($7, article_type),
                thumbnail = COALESCE($8, thumbnail),
                meta_keywords = COALESCE($9, meta_keywords),
                meta_description = COALESCE($10, meta_description),
                status = $11,
                is_top = COALESCE($12, is_top),
                is_comment = COALESCE($13, is_comment),
                published_at = $14
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&update_query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.content_model)
            .bind(&input.article_type)
            .bind(&input.thumbnail)
            .bind(&input.meta_keywords)
            .bind(&input.meta_description)
            .bind(status)
            .bind(input.is_top)
            .bind(input.is_comment)
            .bind(published_at)
            .fetch_one(&mut *tx)
            .await?;

        let tag_ids = Self::resolve_tags_inner(&mut tx, &input.tag_ids, &input.add_tags).await?;
        let category_ids = Self::set_categories_inner(&mut tx, id, &input.category_ids).await?;
        let tag_ids = Self::set_tags_inner(&mut tx, id, &tag_ids).await?;

        tx.commit().await?;
        Ok(Some(ArticleDetail {
            article,
            category_ids,
            tag_ids,
        }))
    }

    /// Delete an article with its join rows and comments.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for statement in [
            "DELETE FROM article_categories WHERE article_id = $1",
            "DELETE FROM article_tags WHERE article_id = $1",
            "DELETE FROM comments WHERE article_id = $1",
        ] {
            sqlx::query(statement).bind(id).execute(&mut *tx).await?;
        }

        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the view counter of a published article.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Association helpers
    // -----------------------------------------------------------------------

    pub async fn category_ids(pool: &PgPool, article_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT category_id FROM article_categories WHERE article_id = $1 ORDER BY category_id",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }

    pub async fn tag_ids(pool: &PgPool, article_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT tag_id FROM article_tags WHERE article_id = $1 ORDER BY tag_id")
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Merge explicit tag ids with the ids of the named tags, creating any
    /// unknown names.
    async fn resolve_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tag_ids: &[DbId],
        add_tags: &[String],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut ids = tag_ids.to_vec();
        for name in add_tags.iter().filter(|n| !n.trim().is_empty()) {
            ids.push(TagRepo::find_or_create_inner(tx, name).await?);
        }
        Ok(ids)
    }

    /// Replace category associations within an existing transaction.
    ///
    /// Returns the stored ids, de-duplicated and sorted.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        article_id: DbId,
        category_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut **tx)
            .await?;

        let ids: Vec<DbId> = category_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        for &category_id in &ids {
            sqlx::query("INSERT INTO article_categories (article_id, category_id) VALUES ($1, $2)")
                .bind(article_id)
                .bind(category_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(ids)
    }

    /// Replace tag associations within an existing transaction.
    async fn set_tags_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        article_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut **tx)
            .await?;

        let ids: Vec<DbId> = tag_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        for &tag_id in &ids {
            sqlx::query("INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2)")
                .bind(article_id)
                .bind(tag_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(ids)
    }
}
