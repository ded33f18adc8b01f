//! Page-number pagination shared by every list endpoint.
//!
//! Requests carry a 1-based `page` and a `page_size`; repositories turn the
//! validated [`Pagination`] into `LIMIT`/`OFFSET` and pair the slice with a
//! total count computed from the same filter.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page used when the request omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the request omits `page_size`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size served; bigger requests are clamped to this.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw `?page=&page_size=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// Rows to skip before the requested page.
    ///
    /// Saturates at `i64::MAX` so far-out pages still reach the database and
    /// come back empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Rows to return (`LIMIT`).
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Validate the raw parameters.
    ///
    /// Missing values take defaults; `page < 1` or `page_size < 1` is a
    /// validation error; oversized pages are clamped to [`MAX_PAGE_SIZE`].
    /// There is no upper bound on `page`.
    pub fn validate(&self) -> Result<Pagination, CoreError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size < 1 {
            return Err(CoreError::Validation(format!(
                "page_size must be greater than 0, got {page_size}"
            )));
        }

        Ok(Pagination {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }
}

/// One page of results plus the total count of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
            pages: page_count(total, pagination.page_size),
        }
    }

    /// Transform every item, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}

/// Number of pages needed for `total` rows.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Build a case-insensitive `ILIKE` pattern matching `needle` as a substring.
///
/// `%`, `_`, and `\` are escaped so user input is matched literally.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Normalise an optional search term: blank strings become `None`.
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
