//! Repository for the `comments` table.
//!
//! Any write that can move a comment into or out of `approved` recomputes
//! the owning article's `comment_count` in the same transaction.

use matuto_core::comment::ParentRef;
use matuto_core::moderation::{articles_to_recount, CommentStatus, Transition};
use matuto_core::pagination::{search_term, Page, Pagination};
use matuto_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{ClientInfo, Comment, CommentQuery, CreateComment, PublicComment};

/// Column list for the `comments` table.
const COLUMNS: &str = "id, article_id, parent_id, top_parent_id, author, email, url, content, \
    status, ip, user_agent, created_at, updated_at";

/// Column list for [`PublicComment`].
const PUBLIC_COLUMNS: &str = "id, parent_id, top_parent_id, author, url, content, created_at";

const ADMIN_FILTER: &str = "($1::SMALLINT IS NULL OR status = $1)
      AND ($2::BIGINT IS NULL OR article_id = $2)
      AND ($3::TEXT IS NULL OR author ILIKE $3 OR content ILIKE $3 OR email ILIKE $3)";

/// Provides moderation and CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a visitor comment in the `pending` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
        top_parent_id: Option<DbId>,
        client: &ClientInfo,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments
                (article_id, parent_id, top_parent_id, author, email, url, content, status,
                 ip, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.article_id)
            .bind(input.parent_id)
            .bind(top_parent_id)
            .bind(input.author.trim())
            .bind(input.email.as_deref().map(str::trim).filter(|e| !e.is_empty()))
            .bind(&input.url)
            .bind(input.content.trim())
            .bind(CommentStatus::Pending.id())
            .bind(&client.ip)
            .bind(&client.user_agent)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Threading fields of a prospective parent comment.
    pub async fn find_parent(pool: &PgPool, id: DbId) -> Result<Option<ParentRef>, sqlx::Error> {
        let row: Option<(DbId, DbId, Option<DbId>)> =
            sqlx::query_as("SELECT id, article_id, top_parent_id FROM comments WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(id, article_id, top_parent_id)| ParentRef {
            id,
            article_id,
            top_parent_id,
        }))
    }

    /// One page of the moderation queue, newest first.
    pub async fn list_page(
        pool: &PgPool,
        params: &CommentQuery,
        pagination: Pagination,
    ) -> Result<Page<Comment>, sqlx::Error> {
        let keyword = search_term(params.keyword.as_deref());

        let count_query = format!("SELECT COUNT(*) FROM comments WHERE {ADMIN_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(params.status)
            .bind(params.article_id)
            .bind(&keyword)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE {ADMIN_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Comment>(&query)
            .bind(params.status)
            .bind(params.article_id)
            .bind(&keyword)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, pagination))
    }

    /// Approved comments of an article, oldest first.
    pub async fn list_approved(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<PublicComment>, sqlx::Error> {
        let query = format!(
            "SELECT {PUBLIC_COLUMNS} FROM comments
             WHERE article_id = $1 AND status = $2
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, PublicComment>(&query)
            .bind(article_id)
            .bind(CommentStatus::Approved.id())
            .fetch_all(pool)
            .await
    }

    /// Number of approved comments on an article.
    pub async fn count_approved(pool: &PgPool, article_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE article_id = $1 AND status = $2")
            .bind(article_id)
            .bind(CommentStatus::Approved.id())
            .fetch_one(pool)
            .await
    }

    /// Move one comment to `status`, recounting its article when the
    /// approved set changed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: CommentStatus,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<i16> =
            sqlx::query_scalar("SELECT status FROM comments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let query = format!("UPDATE comments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(&mut *tx)
            .await?;

        // An unrecognised stored status always recounts.
        let affects_count = CommentStatus::try_from(current)
            .map(|from| Transition::new(from, status).affects_comment_count())
            .unwrap_or(true);
        if affects_count {
            Self::recount_inner(&mut tx, comment.article_id).await?;
        }

        tx.commit().await?;
        Ok(Some(comment))
    }

    /// Move every comment in `ids` to `status` and recount each affected
    /// article once. Unknown ids are ignored.
    ///
    /// Returns the number of comments updated.
    pub async fn batch_update_status(
        pool: &PgPool,
        ids: &[DbId],
        status: CommentStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let touched: Vec<DbId> = sqlx::query_scalar(
            "UPDATE comments SET status = $2 WHERE id = ANY($1) RETURNING article_id",
        )
        .bind(ids)
        .bind(status.id())
        .fetch_all(&mut *tx)
        .await?;

        for article_id in articles_to_recount(touched.iter().copied()) {
            Self::recount_inner(&mut tx, article_id).await?;
        }

        tx.commit().await?;
        Ok(touched.len() as u64)
    }

    /// Delete a comment and every reply below it, then recount the article.
    ///
    /// Returns the number of comments removed; zero if `id` does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let article_id: Option<DbId> =
            sqlx::query_scalar("SELECT article_id FROM comments WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(article_id) = article_id else {
            return Ok(0);
        };

        let result = sqlx::query(
            "WITH RECURSIVE subtree AS (
                 SELECT id FROM comments WHERE id = $1
                 UNION
                 SELECT c.id FROM comments c
                 JOIN subtree s ON c.parent_id = s.id OR c.top_parent_id = s.id
             )
             DELETE FROM comments WHERE id IN (SELECT id FROM subtree)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        Self::recount_inner(&mut tx, article_id).await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Recompute `articles.comment_count` from the approved comments.
    async fn recount_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        article_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE articles SET comment_count = (
                 SELECT COUNT(*) FROM comments WHERE article_id = $1 AND status = $2
             )
             WHERE id = $1",
        )
        .bind(article_id)
        .bind(CommentStatus::Approved.id())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
