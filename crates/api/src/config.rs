use std::path::PathBuf;

use matuto_core::attach::DEFAULT_MAX_UPLOAD_BYTES;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry, issuer).
    pub jwt: JwtConfig,
    /// Where uploads are written and how they are addressed.
    pub storage: StorageConfig,
    /// First administrator created when the `users` table is empty.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

/// Local filesystem storage for attachments.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for stored files.
    pub base_path: PathBuf,
    /// Public URL prefix joined with each stored relative path.
    pub base_url: String,
    /// Largest accepted upload in bytes.
    pub max_size_bytes: u64,
}

/// Credentials for the bootstrap administrator.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub account: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                       |
    /// |--------------------------|-----------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                     |
    /// | `PORT`                   | `8080`                                        |
    /// | `CORS_ORIGINS`           | `http://localhost:3000,http://localhost:8080` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                          |
    /// | `STORAGE_BASE_PATH`      | `./uploads`                                   |
    /// | `STORAGE_BASE_URL`       | `http://localhost:8080/uploads/`              |
    /// | `STORAGE_MAX_SIZE_BYTES` | `10485760`                                    |
    /// | `ADMIN_ACCOUNT`          | unset                                         |
    /// | `ADMIN_PASSWORD`         | unset                                         |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let storage = StorageConfig::from_env();

        let admin_bootstrap = match (
            std::env::var("ADMIN_ACCOUNT").ok().filter(|s| !s.trim().is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(account), Some(password)) => Some(AdminBootstrap {
                account: account.trim().to_string(),
                password,
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            storage,
            admin_bootstrap,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let base_path = std::env::var("STORAGE_BASE_PATH")
            .unwrap_or_else(|_| "./uploads".into())
            .into();

        let base_url = std::env::var("STORAGE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/uploads/".into());

        let max_size_bytes: u64 = std::env::var("STORAGE_MAX_SIZE_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("STORAGE_MAX_SIZE_BYTES must be a valid u64");

        Self {
            base_path,
            base_url,
            max_size_bytes,
        }
    }
}
