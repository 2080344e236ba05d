//! Database layer
//!
//! Durable probe record storage on a local libsql (SQLite) database,
//! exposed through the `uptime::ProbeStore` trait.

pub mod migrations;
pub mod repository;

pub use repository::LibsqlProbeStore;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::DatabaseConfig;
use crate::pool::{LibsqlManager, LibsqlPool};

/// Initialize database with schema
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}

/// Open the database file, build the connection pool and apply migrations
pub async fn open_pool(config: &DatabaseConfig) -> Result<LibsqlPool> {
    if let Some(parent) = Path::new(&config.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }

    let database = libsql::Builder::new_local(&config.path)
        .build()
        .await
        .with_context(|| format!("opening database {}", config.path))?;

    let pool: LibsqlPool = deadpool::managed::Pool::builder(LibsqlManager::new(database))
        .max_size(config.max_connections)
        .build()?;

    let conn = pool.get().await?;
    initialize_database(&conn).await?;
    tracing::info!(path = %config.path, "Database ready");

    Ok(pool)
}
