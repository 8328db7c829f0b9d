//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the configuration, the
//! read-only recommendation catalog and the database handle, making them
//! accessible to all request handlers.

use crate::config::AppConfig;
use bookrec::{providers::db::sqlite::SqliteProvider, Catalog};
use std::{path::Path, sync::Arc};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The static catalog. Loaded once and never mutated, so no lock is needed.
    pub catalog: Arc<Catalog>,
    /// The database holding accounts, favorites and search history.
    pub sqlite_provider: Arc<SqliteProvider>,
}

/// Builds the shared application state from the configuration.
///
/// This loads the catalog from `data_dir`, opens the SQLite database and
/// makes sure its schema is up to date.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.uses_default_jwt_secret() {
        tracing::warn!("JWT_SECRET is not set; session tokens are signed with the public default secret.");
    }

    let catalog = Catalog::load(&config.data_dir)?;

    if config.db_url != ":memory:" {
        if let Some(parent) = Path::new(&config.db_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    tracing::info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    sqlite_provider.initialize_schema().await?;

    Ok(with_catalog(config, catalog, sqlite_provider))
}

/// Assembles a state from parts that are already built.
pub fn with_catalog(
    config: AppConfig,
    catalog: Catalog,
    sqlite_provider: SqliteProvider,
) -> AppState {
    AppState {
        config: Arc::new(config),
        catalog: Arc::new(catalog),
        sqlite_provider: Arc::new(sqlite_provider),
    }
}
