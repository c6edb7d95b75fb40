//! SQLite database connections
//!
//! Both ChEMBL databases are opened read-only: the transformers only ever
//! query them.

use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::Config;
use crate::query::SqliteChemblQueries;

/// Default maximum connections in the pool
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const MEMORY_PATH: &str = ":memory:";

/// Database configuration options
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Open without write access
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Read-only config for a database file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            read_only: true,
        }
    }

    /// Create a config for an in-memory database (useful for testing)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            max_connections: 1, // each connection would get its own database
            read_only: false,
        }
    }

    /// Set the maximum number of connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }
}

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    config: DatabaseConfig,
}

impl Database {
    /// Open a database with the given configuration
    ///
    /// File databases must already exist.
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let connect_options = if config.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            if !config.path.exists() {
                return Err(anyhow!("Database file not found: {}", config.path.display()));
            }
            SqliteConnectOptions::new()
                .filename(&config.path)
                .read_only(config.read_only)
                .create_if_missing(false)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("Failed to connect to database: {:?}", config.path))?;

        debug!(path = %config.path.display(), read_only = config.read_only, "Opened database");
        Ok(Self { pool, config })
    }

    /// Create an in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self> {
        Self::new(DatabaseConfig::in_memory()).await
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database configuration
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }

    /// Close the database connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

/// The ChEMBL dump and the target cross-reference database
#[derive(Debug, Clone)]
pub struct ChemblDatabases {
    chembl: Database,
    xref: Database,
}

impl ChemblDatabases {
    /// Open both databases named by the configuration
    pub async fn open(config: &Config) -> Result<Self> {
        let settings = &config.database;
        let chembl = Database::new(
            DatabaseConfig::with_path(settings.resolved_chembl_path())
                .max_connections(settings.max_connections),
        )
        .await
        .context("Failed to open the ChEMBL database")?;
        let xref = Database::new(
            DatabaseConfig::with_path(settings.resolved_xref_path())
                .max_connections(settings.max_connections),
        )
        .await
        .context("Failed to open the target cross-reference database")?;

        info!(
            chembl = %chembl.path().display(),
            xref = %xref.path().display(),
            "Opened ChEMBL databases"
        );
        Ok(Self { chembl, xref })
    }

    /// Pair two already-open databases
    pub fn from_databases(chembl: Database, xref: Database) -> Self {
        Self { chembl, xref }
    }

    pub fn chembl(&self) -> &Database {
        &self.chembl
    }

    pub fn xref(&self) -> &Database {
        &self.xref
    }

    /// Query service over both databases
    pub fn queries(&self) -> SqliteChemblQueries {
        SqliteChemblQueries::new(self.chembl.pool().clone(), self.xref.pool().clone())
    }

    /// Check both databases
    pub async fn health_check(&self) -> Result<()> {
        self.chembl.health_check().await.context("ChEMBL database")?;
        self.xref.health_check().await.context("Cross-reference database")?;
        Ok(())
    }

    /// Close both connection pools
    pub async fn close(&self) {
        self.chembl.close().await;
        self.xref.close().await;
    }
}
