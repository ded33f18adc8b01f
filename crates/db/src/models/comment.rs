//! Comment entity model and DTOs.

use matuto_core::comment::ThreadKey;
use matuto_core::pagination::PageRequest;
use matuto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub article_id: DbId,
    pub parent_id: Option<DbId>,
    pub top_parent_id: Option<DbId>,
    pub author: String,
    pub email: Option<String>,
    pub url: Option<String>,
    pub content: String,
    pub status: i16,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Visitor-facing projection: no email, IP, or user agent.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicComment {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub top_parent_id: Option<DbId>,
    pub author: String,
    pub url: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}

impl From<Comment> for PublicComment {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            parent_id: comment.parent_id,
            top_parent_id: comment.top_parent_id,
            author: comment.author,
            url: comment.url,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

impl PublicComment {
    pub fn thread_key(&self) -> ThreadKey {
        ThreadKey {
            id: self.id,
            top_parent_id: self.top_parent_id,
            created_at: self.created_at,
        }
    }
}

/// DTO for a visitor submitting a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateComment {
    pub article_id: DbId,
    pub parent_id: Option<DbId>,
    pub author: String,
    pub email: Option<String>,
    pub url: Option<String>,
    pub content: String,
}

/// Request metadata recorded with a new comment.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Body of `PATCH /admin/comments/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentStatus {
    pub status: i16,
}

/// Body of `POST /admin/comments/batch-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCommentStatus {
    pub ids: Vec<DbId>,
    pub status: i16,
}

/// Admin list filters (`GET /admin/comments`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<i16>,
    pub article_id: Option<DbId>,
    /// Substring match on author, content, or email.
    pub keyword: Option<String>,
}

impl CommentQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
