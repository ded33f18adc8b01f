//! Comment moderation state machine.
//!
//! Comments move between `pending`, `approved`, and `rejected` at an admin's
//! request. Every state is reachable from every other state. The only side
//! effect a transition carries is on the parent article's derived
//! `comment_count`, which counts approved comments and must be recomputed
//! whenever a comment enters or leaves `approved`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Moderation status of a comment, stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum CommentStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl CommentStatus {
    /// Database value.
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }

    /// Whether comments in this state count towards `comment_count`.
    pub fn is_counted(self) -> bool {
        self == CommentStatus::Approved
    }
}

impl TryFrom<i16> for CommentStatus {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CommentStatus::Pending),
            1 => Ok(CommentStatus::Approved),
            2 => Ok(CommentStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid comment status {other}. Must be 0 (pending), 1 (approved), or 2 (rejected)"
            ))),
        }
    }
}

impl From<CommentStatus> for i16 {
    fn from(value: CommentStatus) -> Self {
        value.id()
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single status change applied to one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CommentStatus,
    pub to: CommentStatus,
}

impl Transition {
    pub fn new(from: CommentStatus, to: CommentStatus) -> Self {
        Self { from, to }
    }

    /// True when the article's approved-comment count may have changed.
    pub fn affects_comment_count(&self) -> bool {
        self.from != self.to && (self.from.is_counted() || self.to.is_counted())
    }
}

/// Validate the id list of a batch status change.
///
/// Rejects an empty list and returns the ids de-duplicated, in ascending order.
pub fn validate_batch_ids(ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation(
            "At least one comment id is required".to_string(),
        ));
    }
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(CoreError::Validation(format!("Invalid comment id {bad}")));
    }
    Ok(ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect())
}

/// Group touched comments by article so each article is recounted once.
pub fn articles_to_recount(article_ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    article_ids
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_round_trips_through_database_value() {
        for status in [
            CommentStatus::Pending,
            CommentStatus::Approved,
            CommentStatus::Rejected,
        ] {
            assert_eq!(CommentStatus::try_from(status.id()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_matches!(CommentStatus::try_from(3), Err(CoreError::Validation(_)));
        assert_matches!(CommentStatus::try_from(-1), Err(CoreError::Validation(_)));
    }

    #[test]
    fn approving_or_unapproving_affects_count() {
        use CommentStatus::*;
        assert!(Transition::new(Pending, Approved).affects_comment_count());
        assert!(Transition::new(Approved, Rejected).affects_comment_count());
        assert!(Transition::new(Rejected, Approved).affects_comment_count());
        assert!(Transition::new(Approved, Pending).affects_comment_count());
    }

    #[test]
    fn transitions_outside_approved_leave_count_alone() {
        use CommentStatus::*;
        assert!(!Transition::new(Pending, Rejected).affects_comment_count());
        assert!(!Transition::new(Rejected, Pending).affects_comment_count());
        assert!(!Transition::new(Approved, Approved).affects_comment_count());
    }

    #[test]
    fn batch_ids_must_not_be_empty() {
        assert_matches!(validate_batch_ids(&[]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn batch_ids_are_deduplicated() {
        assert_eq!(validate_batch_ids(&[3, 1, 3, 2]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn batch_ids_reject_non_positive() {
        assert_matches!(validate_batch_ids(&[1, 0]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn each_article_is_recounted_once() {
        assert_eq!(articles_to_recount([7, 3, 7, 7, 3]), vec![3, 7]);
    }
}
