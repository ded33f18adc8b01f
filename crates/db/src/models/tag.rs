//! Tag entity model and DTOs.

use matuto_core::pagination::PageRequest;
use matuto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub thumbnail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public tag listing with the number of published articles using it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagUsage {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub article_count: i64,
}

/// DTO for creating a tag. `color` defaults to `#007bff`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub thumbnail: Option<String>,
}

/// DTO for updating a tag. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub thumbnail: Option<String>,
}

/// Admin list filters (`GET /admin/tags`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub name: Option<String>,
}

impl TagQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
