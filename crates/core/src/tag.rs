//! Tag rules: name and color validation.

use crate::error::CoreError;

/// Color assigned when a tag is created without one.
pub const DEFAULT_TAG_COLOR: &str = "#007bff";

pub const MAX_TAG_NAME_LENGTH: usize = 64;

pub fn validate_tag_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Tag name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tag name must be at most {MAX_TAG_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Accept `#rgb` or `#rrggbb` hex colors.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Expected #rgb or #rrggbb"
        )))
    }
}

/// The color to store: the requested one when present, else the default.
pub fn resolve_color(requested: Option<&str>) -> Result<String, CoreError> {
    match requested.map(str::trim).filter(|c| !c.is_empty()) {
        Some(color) => {
            validate_color(color)?;
            Ok(color.to_string())
        }
        None => Ok(DEFAULT_TAG_COLOR.to_string()),
    }
}

/// Blocking error when a tag is still attached to articles.
pub fn delete_blocker(article_count: i64) -> Option<CoreError> {
    (article_count > 0).then(|| {
        CoreError::Conflict(format!(
            "Tag is used by {article_count} articles and cannot be deleted"
        ))
    })
}
