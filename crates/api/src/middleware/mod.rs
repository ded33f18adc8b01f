//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated administrator from a JWT Bearer token.
//! - [`client::RequestClient`] -- Client IP and user agent for comment submissions.

pub mod auth;
pub mod client;
