//! Storage layer - SQLite
//!
//! Provides database management and migrations for tilex.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration
//!
//! # Usage
//!
//! ```ignore
//! use tilex_core::storage::{Database, DatabaseConfig};
//!
//! // Create an in-memory database for testing
//! let db = Database::in_memory().await?;
//!
//! // Or open the configured database file
//! let db = Database::new(DatabaseConfig::with_path("/var/lib/tilex/tilex.db")).await?;
//! ```

pub mod database;
pub mod migrations;

pub use database::{Database, DatabaseConfig, default_database_path};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
