//! User entity model and DTOs.

use matuto_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account status values stored in `users.status`.
pub const USER_STATUS_ACTIVE: i16 = 0;
pub const USER_STATUS_DISABLED: i16 = 1;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub account: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub status: i16,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == USER_STATUS_ACTIVE
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub account: String,
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub status: i16,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            account: user.account,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub account: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}
