//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paged listings put a
//! [`Page`](matuto_core::pagination::Page) inside it.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: page }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Body of batch operations: how many rows were touched.
#[derive(Debug, Serialize)]
pub struct AffectedResponse {
    pub affected: u64,
}
