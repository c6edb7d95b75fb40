//! Storage layer - read-only SQLite
//!
//! # Usage
//!
//! ```ignore
//! use chembl_core::config::Config;
//! use chembl_core::storage::ChemblDatabases;
//!
//! let databases = ChemblDatabases::open(&Config::load()?).await?;
//! let queries = databases.queries();
//! ```

pub mod database;

pub use database::{ChemblDatabases, Database, DatabaseConfig};
