//! Attachment entity model and DTOs.

use matuto_core::attach::access_url;
use matuto_core::pagination::PageRequest;
use matuto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attachments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attach {
    pub id: DbId,
    pub uploaded_by: Option<DbId>,
    pub name: String,
    /// Relative to the storage root.
    pub path: String,
    pub mime_type: Option<String>,
    pub kind: String,
    pub size_bytes: i64,
    pub remark: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Attach {
    /// Attach the public URL derived from `base_url`.
    pub fn with_url(self, base_url: &str) -> AttachResponse {
        let url = access_url(base_url, &self.path);
        AttachResponse { attach: self, url }
    }
}

/// Attachment as returned by the API, with its access URL.
#[derive(Debug, Clone, Serialize)]
pub struct AttachResponse {
    #[serde(flatten)]
    pub attach: Attach,
    pub url: String,
}

/// Insert payload, built by the upload handler after the file is stored.
#[derive(Debug, Clone)]
pub struct CreateAttach {
    pub uploaded_by: Option<DbId>,
    pub name: String,
    pub path: String,
    pub mime_type: Option<String>,
    pub kind: String,
    pub size_bytes: i64,
    pub remark: Option<String>,
}

/// Body of `POST /admin/attachments/batch-delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteAttach {
    pub ids: Vec<DbId>,
}

/// Admin list filters (`GET /admin/attachments`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Substring match on the original filename.
    pub keyword: Option<String>,
    pub kind: Option<String>,
}

impl AttachQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
