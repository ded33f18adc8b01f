//! Domain rules for the Matuto blog backend.
//!
//! Everything here is pure and database-free so the DB and API layers can
//! share one definition of each rule.

pub mod article;
pub mod attach;
pub mod category;
pub mod comment;
pub mod error;
pub mod moderation;
pub mod pagination;
pub mod slug;
pub mod tag;
pub mod tree;
pub mod types;
