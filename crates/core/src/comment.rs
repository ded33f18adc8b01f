//! Comment submission rules and reply threading.
//!
//! Comments form a two-level structure: every reply carries `parent_id`
//! (the comment it answers) and `top_parent_id` (the root of its thread).
//! Threads are rebuilt from those two pointers; rows never reference each
//! other directly.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

pub const MAX_AUTHOR_LENGTH: usize = 64;
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Validate the visitor-supplied fields of a new comment.
pub fn validate_submission(
    author: &str,
    email: Option<&str>,
    content: &str,
) -> Result<(), CoreError> {
    let author = author.trim();
    if author.is_empty() {
        return Err(CoreError::Validation("Author must not be empty".to_string()));
    }
    if author.chars().count() > MAX_AUTHOR_LENGTH {
        return Err(CoreError::Validation(format!(
            "Author must be at most {MAX_AUTHOR_LENGTH} characters"
        )));
    }

    let content = content.trim();
    if content.is_empty() {
        return Err(CoreError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }

    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
        if !looks_like_email(email) {
            return Err(CoreError::Validation(format!("Invalid email '{email}'")));
        }
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// The parent a reply is attached to, as loaded from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub id: DbId,
    pub article_id: DbId,
    pub top_parent_id: Option<DbId>,
}

impl ParentRef {
    /// Check the parent belongs to `article_id` and return the thread root
    /// the new reply should point at.
    pub fn thread_root_for(&self, article_id: DbId) -> Result<DbId, CoreError> {
        if self.article_id != article_id {
            return Err(CoreError::Validation(format!(
                "Parent comment {} belongs to a different article",
                self.id
            )));
        }
        Ok(self.top_parent_id.unwrap_or(self.id))
    }
}

// ---------------------------------------------------------------------------
// Threading
// ---------------------------------------------------------------------------

/// Fields threading needs from a comment row.
#[derive(Debug, Clone, Copy)]
pub struct ThreadKey {
    pub id: DbId,
    pub top_parent_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// A root comment with all replies in its thread, flattened.
#[derive(Debug, Clone, Serialize)]
pub struct Thread<T> {
    #[serde(flatten)]
    pub comment: T,
    pub replies: Vec<T>,
}

/// Group comments into threads.
///
/// Roots are ordered newest first, replies oldest first. A reply whose root
/// is not in `comments` (e.g. the root was not approved) is dropped.
pub fn build_threads<T>(comments: Vec<T>, key: impl Fn(&T) -> ThreadKey) -> Vec<Thread<T>> {
    let mut roots: Vec<(ThreadKey, T)> = Vec::new();
    let mut replies: HashMap<DbId, Vec<(ThreadKey, T)>> = HashMap::new();

    for comment in comments {
        let k = key(&comment);
        match k.top_parent_id.filter(|top| *top != k.id) {
            Some(top) => replies.entry(top).or_default().push((k, comment)),
            None => roots.push((k, comment)),
        }
    }

    roots.sort_by(|(a, _), (b, _)| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

    roots
        .into_iter()
        .map(|(k, comment)| {
            let mut thread = replies.remove(&k.id).unwrap_or_default();
            thread.sort_by(|(a, _), (b, _)| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            Thread {
                comment,
                replies: thread.into_iter().map(|(_, c)| c).collect(),
            }
        })
        .collect()
}
