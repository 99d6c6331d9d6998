//! Configuration and database access

pub mod repository;
pub mod settings;

pub use settings::Settings;

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection string for a private in-memory database
#[cfg(test)]
pub const MEMORY_DATABASE: &str = "sqlite::memory:";

/// Loaded settings plus an open, migrated database
pub struct Config {
    pub settings: Settings,
    pub pool: SqlitePool,
}

impl Config {
    /// Load settings and open the database; `database` overrides the configured location
    pub async fn load(database: Option<&str>) -> Result<Self> {
        let mut settings = Settings::load()?;
        if let Some(database) = database {
            settings.database = database.to_string();
        }

        log::debug!("Using database: {}", settings.database);
        let pool = connect(&settings.database).await?;

        Ok(Self { settings, pool })
    }
}

/// Open a SQLite database (file path or `sqlite:` URL) and run migrations
pub async fn connect(database: &str) -> Result<SqlitePool> {
    let in_memory = database.contains(":memory:");

    let options = if database.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database)
            .with_context(|| format!("Invalid database URL: {}", database))?
    } else {
        if let Some(parent) = Path::new(database).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }
        SqliteConnectOptions::new().filename(database)
    }
    .create_if_missing(true)
    .foreign_keys(true);

    // Every connection to :memory: is a separate database
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(4)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", database))?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_is_migrated() {
        let pool = connect(MEMORY_DATABASE).await.unwrap();
        assert_eq!(repository::staff::count_staff(&pool).await.unwrap(), 0);
    }
}
