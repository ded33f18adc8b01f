//! HTTP layer of the blog backend: configuration, authentication, handlers,
//! route tables, and the attachment storage backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
