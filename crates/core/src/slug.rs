//! URL slug generation for articles, categories, and tags.
//!
//! Letters are lowercased, decimal digits are kept, and separators collapse
//! to a single hyphen. Han-script characters are replaced by the first
//! letter of their pinyin reading so Chinese titles still produce short
//! ASCII slugs.

use pinyin::ToPinyin;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_script::{Script, UnicodeScript};

/// Separator emitted for whitespace, `-`, and `_`.
const SEPARATOR: char = '-';

/// Derive a URL-safe slug from an arbitrary title or name.
///
/// Deterministic: the same input always yields the same slug, and an empty
/// (or fully dropped) input yields an empty string.
pub fn generate_slug(input: &str) -> String {
    let mut raw = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.script() == Script::Han {
            // Han characters without a known reading (iteration marks,
            // radicals, Hangzhou numerals) are dropped.
            if let Some(letter) = ch.to_pinyin().and_then(|p| p.first_letter().chars().next()) {
                raw.extend(letter.to_lowercase());
            }
        } else if ch.general_category_group() == GeneralCategoryGroup::Letter {
            raw.extend(ch.to_lowercase());
        } else if ch.general_category() == GeneralCategory::DecimalNumber {
            raw.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            raw.push(SEPARATOR);
        }
    }

    collapse_separators(&raw)
}

/// Pick the slug to persist: a non-blank caller-supplied slug always wins,
/// otherwise one is generated from `source`.
pub fn resolve_slug(requested: Option<&str>, source: &str) -> String {
    match requested.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => generate_slug(source),
    }
}

/// Strip leading/trailing separators and collapse runs of them to one.
fn collapse_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.chars() {
        if ch == SEPARATOR {
            pending_separator = !out.is_empty();
            continue;
        }
        if pending_separator {
            out.push(SEPARATOR);
            pending_separator = false;
        }
        out.push(ch);
    }

    out
}
