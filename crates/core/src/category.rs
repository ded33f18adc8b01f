//! Category rules: status values, parent normalisation, and cycle checks.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::tree::Adjacency;
use crate::types::DbId;

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 256;

/// Category visibility, stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum CategoryStatus {
    Active = 0,
    Disabled = 1,
}

impl CategoryStatus {
    pub fn id(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for CategoryStatus {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CategoryStatus::Active),
            1 => Ok(CategoryStatus::Disabled),
            other => Err(CoreError::Validation(format!(
                "Invalid category status {other}. Must be 0 (active) or 1 (disabled)"
            ))),
        }
    }
}

impl From<CategoryStatus> for i16 {
    fn from(value: CategoryStatus) -> Self {
        value.id()
    }
}

/// Map the legacy "no parent" markers (`-1`, `0`) to `None`.
pub fn normalize_parent(parent_id: Option<DbId>) -> Option<DbId> {
    parent_id.filter(|id| *id > 0)
}

/// Validate a category name.
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Category name must be at most {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Check that `parent_id` is an acceptable parent for category `id`.
///
/// `id` is `None` when the category is being created. A category may not be
/// its own parent, nor may it hang below one of its own descendants.
pub fn validate_parent(
    id: Option<DbId>,
    parent_id: Option<DbId>,
    tree: &Adjacency,
) -> Result<(), CoreError> {
    let (Some(id), Some(parent_id)) = (id, parent_id) else {
        return Ok(());
    };

    if parent_id == id {
        return Err(CoreError::Validation(
            "A category cannot be its own parent".to_string(),
        ));
    }
    if tree.is_descendant(id, parent_id) {
        return Err(CoreError::Validation(format!(
            "Category {parent_id} is a descendant of category {id} and cannot be its parent"
        )));
    }
    Ok(())
}

/// Build the blocking message for a category that still has dependents.
///
/// Returns `None` when the category can be deleted.
pub fn delete_blocker(child_count: i64, article_count: i64) -> Option<CoreError> {
    if child_count > 0 {
        return Some(CoreError::Conflict(format!(
            "Category has {child_count} child categories and cannot be deleted"
        )));
    }
    if article_count > 0 {
        return Some(CoreError::Conflict(format!(
            "Category is used by {article_count} articles and cannot be deleted"
        )));
    }
    None
}
