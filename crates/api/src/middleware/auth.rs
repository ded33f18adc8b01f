//! Bearer-token extractor guarding the `/admin` routes and `/auth/me`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use matuto_core::error::CoreError;
use matuto_core::types::DbId;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// The administrator behind a request, taken from its access token.
///
/// Every account is an administrator, so holding a valid token is the only
/// check the admin routes make. Handlers use the id to attribute writes:
///
/// ```ignore
/// pub async fn delete_tag(
///     auth: AuthUser,
///     State(state): State<AppState>,
///     Path(id): Path<DbId>,
/// ) -> AppResult<StatusCode> {
///     TagRepo::delete(&state.pool, id).await?;
///     tracing::info!(tag_id = id, user_id = auth.user_id, "Tag deleted");
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// `users.id` of the signed-in administrator (`claims.sub`).
    pub user_id: DbId,
    /// Login account, as issued in the token.
    pub account: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            account: claims.account,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;
        Ok(claims.into())
    }
}

/// The token of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })
}
