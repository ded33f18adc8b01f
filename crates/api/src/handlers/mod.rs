//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers validate input with the rules in `matuto_core`, delegate to the
//! corresponding repository in `matuto_db`, and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod articles;
pub mod attachments;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod public;
pub mod tags;
