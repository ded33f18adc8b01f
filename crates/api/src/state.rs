use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::LocalStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: matuto_db::DbPool,
    /// Server configuration, built once at startup.
    pub config: Arc<ServerConfig>,
    /// Filesystem backend for uploaded attachments.
    pub storage: Arc<LocalStorage>,
}

impl AppState {
    pub fn new(pool: matuto_db::DbPool, config: ServerConfig) -> Self {
        let storage = Arc::new(LocalStorage::new(&config.storage));
        Self {
            pool,
            config: Arc::new(config),
            storage,
        }
    }
}
