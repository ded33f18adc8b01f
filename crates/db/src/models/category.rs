//! Category entity model and DTOs.

use matuto_core::pagination::PageRequest;
use matuto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub sort_order: i32,
    pub status: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
///
/// A `parent_id` of `-1` (or any non-positive id) creates a root category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategory {
    pub parent_id: Option<DbId>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub sort_order: Option<i32>,
    pub status: Option<i16>,
}

/// DTO for updating a category. All fields are optional.
///
/// `parent_id: None` keeps the current parent; a non-positive id moves the
/// category to the root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub parent_id: Option<DbId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub sort_order: Option<i32>,
    pub status: Option<i16>,
}

/// Admin list filters (`GET /admin/categories`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub name: Option<String>,
    pub status: Option<i16>,
}

impl CategoryQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
