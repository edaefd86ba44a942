//! sqlmig Store - version store and SQL executor per dialect
//!
//! Provides:
//! - The `MigrationConnection` / `MigrationTransaction` seam the engine drives
//! - Implementations for SQLite (rusqlite), PostgreSQL (postgres) and MySQL (mysql)
//! - `DbConnection`, a closed union over the three, plus helpers to open one

pub mod any;
pub mod connection;
pub mod db;
pub mod errors;
pub mod mysql;
pub mod pgsql;
pub mod sqlite;

// Re-export key types
pub use any::{DbConnection, DbTransaction};
pub use connection::{MigrationConnection, MigrationTransaction};
pub use errors::Result;
