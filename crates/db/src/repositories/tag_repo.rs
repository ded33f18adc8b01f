//! Repository for the `tags` table.

use matuto_core::pagination::{search_term, Page, Pagination};
use matuto_core::slug::generate_slug;
use matuto_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag, TagQuery, TagUsage, UpdateTag};

/// Column list for the `tags` table.
const COLUMNS: &str = "id, name, slug, color, thumbnail, created_at, updated_at";

/// Provides CRUD operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a new tag. Slug and color are stored as given (the handler
    /// resolves defaults).
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug, color, thumbnail)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, '#007bff'), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(input.name.trim())
            .bind(&input.slug)
            .bind(&input.color)
            .bind(&input.thumbnail)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of tags, newest first, optionally filtered by name.
    pub async fn list_page(
        pool: &PgPool,
        params: &TagQuery,
        pagination: Pagination,
    ) -> Result<Page<Tag>, sqlx::Error> {
        let name = search_term(params.name.as_deref());

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE ($1::TEXT IS NULL OR name ILIKE $1)")
                .bind(&name)
                .fetch_one(pool)
                .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tags
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Tag>(&query)
            .bind(&name)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, pagination))
    }

    /// All tags with the number of published articles carrying each.
    pub async fn list_with_usage(pool: &PgPool) -> Result<Vec<TagUsage>, sqlx::Error> {
        sqlx::query_as::<_, TagUsage>(
            "SELECT t.id, t.name, t.slug, t.color, COUNT(a.id) AS article_count
             FROM tags t
             LEFT JOIN article_tags atg ON atg.tag_id = t.id
             LEFT JOIN articles a ON a.id = atg.article_id AND a.status = 1
             GROUP BY t.id
             ORDER BY article_count DESC, t.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a tag. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                color = COALESCE($4, color),
                thumbnail = COALESCE($5, thumbnail)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.color)
            .bind(&input.thumbnail)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag. Callers check [`TagRepo::article_count`] first.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of articles referencing the tag.
    pub async fn article_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM article_tags WHERE tag_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Resolve a tag name to its id, creating the tag when unknown.
    pub(crate) async fn find_or_create_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
    ) -> Result<DbId, sqlx::Error> {
        let name = name.trim();
        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO tags (name, slug) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_tags_name DO NOTHING
             RETURNING id",
        )
        .bind(name)
        .bind(generate_slug(name))
        .fetch_optional(&mut **tx)
        .await?;

        match inserted {
            Some(id) => Ok(id),
            None => {
                sqlx::query_scalar("SELECT id FROM tags WHERE name = $1")
                    .bind(name)
                    .fetch_one(&mut **tx)
                    .await
            }
        }
    }
}
