//! Repository for the `attachments` table.

use matuto_core::pagination::{search_term, Page, Pagination};
use matuto_core::types::DbId;
use sqlx::PgPool;

use crate::models::attach::{Attach, AttachQuery, CreateAttach};

/// Column list for the `attachments` table.
const COLUMNS: &str = "id, uploaded_by, name, path, mime_type, kind, size_bytes, remark, \
    created_at, updated_at";

const FILTER: &str = "($1::TEXT IS NULL OR name ILIKE $1)
      AND ($2::TEXT IS NULL OR kind = $2)";

/// Provides CRUD operations for attachment records. File bytes are handled
/// by the API's storage layer.
pub struct AttachRepo;

impl AttachRepo {
    /// Record a stored upload.
    pub async fn create(pool: &PgPool, input: &CreateAttach) -> Result<Attach, sqlx::Error> {
        let query = format!(
            "INSERT INTO attachments (uploaded_by, name, path, mime_type, kind, size_bytes, remark)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attach>(&query)
            .bind(input.uploaded_by)
            .bind(&input.name)
            .bind(&input.path)
            .bind(&input.mime_type)
            .bind(&input.kind)
            .bind(input.size_bytes)
            .bind(&input.remark)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attach>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE id = $1");
        sqlx::query_as::<_, Attach>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rows among `ids`; unknown ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Attach>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Attach>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// One page of attachments, newest first.
    pub async fn list_page(
        pool: &PgPool,
        params: &AttachQuery,
        pagination: Pagination,
    ) -> Result<Page<Attach>, sqlx::Error> {
        let keyword = search_term(params.keyword.as_deref());
        let kind = params.kind.as_deref().filter(|k| !k.is_empty());

        let count_query = format!("SELECT COUNT(*) FROM attachments WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&keyword)
            .bind(kind)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM attachments WHERE {FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Attach>(&query)
            .bind(&keyword)
            .bind(kind)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, pagination))
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
