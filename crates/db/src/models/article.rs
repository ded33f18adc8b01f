//! Article entity model and DTOs.
//!
//! Articles own their rows in `article_categories` and `article_tags`; the
//! detail view carries the associated ids alongside the row.

use matuto_core::pagination::PageRequest;
use matuto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub author_id: Option<DbId>,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: String,
    pub content_model: String,
    pub article_type: String,
    pub thumbnail: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub status: i16,
    pub is_top: bool,
    pub is_comment: bool,
    pub view_count: i64,
    pub comment_count: i64,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// List projection of an article (no body).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleSummary {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub article_type: String,
    pub thumbnail: Option<String>,
    pub status: i16,
    pub is_top: bool,
    pub is_comment: bool,
    pub view_count: i64,
    pub comment_count: i64,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An article together with the ids of its categories and tags.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub category_ids: Vec<DbId>,
    pub tag_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating an article.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    /// Generated from the title when absent or blank.
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub content_model: Option<String>,
    pub article_type: Option<String>,
    pub thumbnail: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<i16>,
    pub is_top: Option<bool>,
    pub is_comment: Option<bool>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
    /// Tag names to attach, created on the fly when unknown.
    #[serde(default)]
    pub add_tags: Vec<String>,
}

/// DTO for updating an article.
///
/// Scalar fields left `None` are unchanged. The category and tag sets are
/// always replaced: omitting them clears the associations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub content_model: Option<String>,
    pub article_type: Option<String>,
    pub thumbnail: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<i16>,
    pub is_top: Option<bool>,
    pub is_comment: Option<bool>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
    #[serde(default)]
    pub add_tags: Vec<String>,
}

/// Admin list filters (`GET /admin/articles`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Substring match on the title.
    pub title: Option<String>,
    pub status: Option<i16>,
    pub category_id: Option<DbId>,
    pub tag_id: Option<DbId>,
}

impl ArticleQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Public list filters (`GET /public/articles`). Only published rows match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicArticleQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Substring match on title or content.
    pub keyword: Option<String>,
    pub category_id: Option<DbId>,
    pub tag_id: Option<DbId>,
}

impl PublicArticleQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
