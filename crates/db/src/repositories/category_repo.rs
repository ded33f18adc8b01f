//! Repository for the `categories` table.

use matuto_core::category::{normalize_parent, validate_parent};
use matuto_core::error::CoreError;
use matuto_core::pagination::{search_term, Page, Pagination};
use matuto_core::tree::Adjacency;
use matuto_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryQuery, CreateCategory, UpdateCategory};

/// Column list for the `categories` table.
const COLUMNS: &str = "id, parent_id, name, slug, description, thumbnail, meta_keywords, \
    meta_description, sort_order, status, created_at, updated_at";

/// Failure of [`CategoryRepo::update`].
#[derive(Debug, thiserror::Error)]
pub enum CategoryUpdateError {
    /// The requested parent would make the category its own ancestor.
    #[error(transparent)]
    InvalidParent(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD operations and tree lookups for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category. A non-positive `parent_id` creates a root.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories
                (parent_id, name, slug, description, thumbnail, meta_keywords,
                 meta_description, sort_order, status)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(normalize_parent(input.parent_id))
            .bind(input.name.trim())
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.thumbnail)
            .bind(&input.meta_keywords)
            .bind(&input.meta_description)
            .bind(input.sort_order)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of categories, newest first.
    pub async fn list_page(
        pool: &PgPool,
        params: &CategoryQuery,
        pagination: Pagination,
    ) -> Result<Page<Category>, sqlx::Error> {
        let name = search_term(params.name.as_deref());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
               AND ($2::SMALLINT IS NULL OR status = $2)",
        )
        .bind(&name)
        .bind(params.status)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
               AND ($2::SMALLINT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Category>(&query)
            .bind(&name)
            .bind(params.status)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(Page::new(items, total, pagination))
    }

    /// Every category in display order, for building the tree.
    pub async fn list_all(pool: &PgPool, active_only: bool) -> Result<Vec<Category>, sqlx::Error> {
        let query = if active_only {
            format!("SELECT {COLUMNS} FROM categories WHERE status = 0 ORDER BY sort_order, id")
        } else {
            format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order, id")
        };
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Parent index over all categories.
    pub async fn adjacency<'e, E>(executor: E) -> Result<Adjacency, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let edges: Vec<(DbId, Option<DbId>)> =
            sqlx::query_as("SELECT id, parent_id FROM categories")
                .fetch_all(executor)
                .await?;
        Ok(Adjacency::from_edges(edges))
    }

    /// Update a category. Only non-`None` fields are applied; a
    /// non-positive `parent_id` moves the category to the root.
    ///
    /// A move below another category is checked for cycles and applied in
    /// one transaction. Concurrent moves serialize on a table lock, so the
    /// check always sees every committed parent edge.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, CategoryUpdateError> {
        let mut tx = pool.begin().await?;

        if let Some(parent_id) = normalize_parent(input.parent_id) {
            sqlx::query("LOCK TABLE categories IN SHARE ROW EXCLUSIVE MODE")
                .execute(&mut *tx)
                .await?;
            let tree = Self::adjacency(&mut *tx).await?;
            validate_parent(Some(id), Some(parent_id), &tree)?;
        }

        let query = format!(
            "UPDATE categories SET
                parent_id = CASE
                    WHEN $2::BIGINT IS NULL THEN parent_id
                    WHEN $2 <= 0 THEN NULL
                    ELSE $2
                END,
                name = COALESCE($3, name),
                slug = COALESCE($4, slug),
                description = COALESCE($5, description),
                thumbnail = COALESCE($6, thumbnail),
                meta_keywords = COALESCE($7, meta_keywords),
                meta_description = COALESCE($8, meta_description),
                sort_order = COALESCE($9, sort_order),
                status = COALESCE($10, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.parent_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.thumbnail)
            .bind(&input.meta_keywords)
            .bind(&input.meta_description)
            .bind(input.sort_order)
            .bind(input.status)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Delete a category. Callers check [`CategoryRepo::child_count`] and
    /// [`CategoryRepo::article_count`] first.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of direct children.
    pub async fn child_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Number of articles filed under the category.
    pub async fn article_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM article_categories WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT id FROM categories WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
