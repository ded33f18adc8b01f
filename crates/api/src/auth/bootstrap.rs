//! First-run administrator seeding.

use matuto_db::models::user::{CreateUser, User};
use matuto_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Bootstrap password rejected: {0}")]
    WeakPassword(String),

    #[error("Failed to hash bootstrap password: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the configured administrator when no account exists yet.
///
/// Returns the new user, or `None` when the `users` table already has rows.
pub async fn seed_admin(
    pool: &PgPool,
    admin: &AdminBootstrap,
) -> Result<Option<User>, BootstrapError> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(BootstrapError::WeakPassword)?;
    let password_hash =
        hash_password(&admin.password).map_err(|e| BootstrapError::Hash(e.to_string()))?;

    let input = CreateUser {
        account: admin.account.clone(),
        username: admin.account.clone(),
        email: None,
        password_hash,
    };
    Ok(Some(UserRepo::create(pool, &input).await?))
}
