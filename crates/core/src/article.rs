//! Article rules: publication status, content model, and input validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length of an article title.
pub const MAX_TITLE_LENGTH: usize = 512;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Publication status, stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum ArticleStatus {
    #[default]
    Draft = 0,
    Published = 1,
}

impl ArticleStatus {
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn is_published(self) -> bool {
        self == ArticleStatus::Published
    }
}

impl TryFrom<i16> for ArticleStatus {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ArticleStatus::Draft),
            1 => Ok(ArticleStatus::Published),
            other => Err(CoreError::Validation(format!(
                "Invalid article status {other}. Must be 0 (draft) or 1 (published)"
            ))),
        }
    }
}

impl From<ArticleStatus> for i16 {
    fn from(value: ArticleStatus) -> Self {
        value.id()
    }
}

/// `published_at` after a save: stamped on the first transition to
/// published and never moved afterwards.
pub fn resolve_published_at(
    current: Option<Timestamp>,
    status: ArticleStatus,
    now: Timestamp,
) -> Option<Timestamp> {
    match (current, status) {
        (Some(at), _) => Some(at),
        (None, ArticleStatus::Published) => Some(now),
        (None, ArticleStatus::Draft) => None,
    }
}

// ---------------------------------------------------------------------------
// Content model / type
// ---------------------------------------------------------------------------

/// Markup language of the article body.
pub const CONTENT_MODELS: &[&str] = &["markdown", "html"];

/// Kind of entry: a dated article or a standalone page.
pub const ARTICLE_TYPES: &[&str] = &["article", "page"];

pub const DEFAULT_CONTENT_MODEL: &str = "markdown";
pub const DEFAULT_ARTICLE_TYPE: &str = "article";

pub fn validate_content_model(value: &str) -> Result<(), CoreError> {
    if CONTENT_MODELS.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid content_model '{value}'. Must be one of: {}",
            CONTENT_MODELS.join(", ")
        )))
    }
}

pub fn validate_article_type(value: &str) -> Result<(), CoreError> {
    if ARTICLE_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid article_type '{value}'. Must be one of: {}",
            ARTICLE_TYPES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Normalise a requested category/tag id set: duplicates collapse and the
/// result is sorted. Non-positive ids are rejected.
pub fn normalize_ids(field: &str, ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(CoreError::Validation(format!("Invalid {field} entry {bad}")));
    }
    Ok(ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect())
}

/// Ids from `requested` that were not found in `existing`.
pub fn missing_ids(requested: &[DbId], existing: &[DbId]) -> Vec<DbId> {
    let existing: BTreeSet<DbId> = existing.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect()
}
