//! Attachment rules: accepted uploads, storage layout, and access URLs.
//!
//! Files live under a configured storage root in one directory per upload
//! day. Only the path relative to that root is persisted; the public URL is
//! derived from the configured base URL every time a row is read.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upload size limit used when none is configured (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Longest original filename accepted.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Extensions (lowercase, with the dot) that may be uploaded.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".pdf", ".doc", ".docx", ".txt", ".zip", ".rar",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// Coarse attachment category, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachKind {
    Image,
    File,
    Video,
    Audio,
}

impl AttachKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachKind::Image => "image",
            AttachKind::File => "file",
            AttachKind::Video => "video",
            AttachKind::Audio => "audio",
        }
    }

    /// Classify an upload by MIME type, falling back to its extension.
    pub fn detect(mime_type: Option<&str>, filename: &str) -> Self {
        let mime = mime_type.unwrap_or_default().to_ascii_lowercase();
        if mime.starts_with("image/") {
            return AttachKind::Image;
        }
        if mime.starts_with("video/") {
            return AttachKind::Video;
        }
        if mime.starts_with("audio/") {
            return AttachKind::Audio;
        }
        match extension(filename) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => AttachKind::Image,
            _ => AttachKind::File,
        }
    }
}

impl TryFrom<&str> for AttachKind {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "image" => Ok(AttachKind::Image),
            "file" => Ok(AttachKind::File),
            "video" => Ok(AttachKind::Video),
            "audio" => Ok(AttachKind::Audio),
            other => Err(CoreError::Validation(format!(
                "Invalid attachment kind '{other}'. Must be one of: image, file, video, audio"
            ))),
        }
    }
}

impl fmt::Display for AttachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Upload validation
// ---------------------------------------------------------------------------

/// Lowercased extension of `filename` including the leading dot.
pub fn extension(filename: &str) -> Option<String> {
    let name = base_name(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// Check an incoming upload against the extension allow-list and size limit.
pub fn validate_upload(filename: &str, size: u64, max_size: u64) -> Result<(), CoreError> {
    let name = base_name(filename);
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Uploaded file has no name".to_string()));
    }
    if name.chars().count() > MAX_FILENAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "File name must be at most {MAX_FILENAME_LENGTH} characters"
        )));
    }

    match extension(name) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(CoreError::Validation(format!(
                "Unsupported file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )))
        }
    }

    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".to_string()));
    }
    if size > max_size {
        return Err(CoreError::Validation(format!(
            "File is {size} bytes; the limit is {max_size} bytes"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Storage layout
// ---------------------------------------------------------------------------

/// Final path component of a client-supplied name (both separators).
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

/// Make a client filename safe to place on disk.
///
/// Directory components are stripped, whitespace becomes `_`, and control
/// characters are removed. An empty result becomes `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = base_name(filename)
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Path of a new upload relative to the storage root:
/// `YYYY-MM-DD/{unix_nanos}_{sanitized_name}`.
pub fn storage_path(filename: &str, now: DateTime<Utc>) -> String {
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros() * 1_000);
    format!(
        "{}/{}_{}",
        now.format("%Y-%m-%d"),
        nanos,
        sanitize_filename(filename)
    )
}

/// Reject stored paths that could escape the storage root.
pub fn validate_relative_path(path: &str) -> Result<(), CoreError> {
    let escapes = path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| segment == ".." || segment.is_empty());
    if escapes {
        return Err(CoreError::Validation(format!(
            "Invalid attachment path '{path}'"
        )));
    }
    Ok(())
}

/// Public URL for a stored path: `base_url` joined with `path` by one `/`.
pub fn access_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
