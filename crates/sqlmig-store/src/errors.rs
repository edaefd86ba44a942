//! Error handling for sqlmig-store
//!
//! Wraps sqlmig-core MigError with driver-specific helpers

use sqlmig_core::errors::{MigError, MigErrorKind};
use sqlmig_core::Migration;

/// Result type alias using MigError
pub type Result<T> = std::result::Result<T, MigError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> MigError {
    MigError::new(MigErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a database error from postgres::Error
pub fn from_postgres(err: postgres::Error) -> MigError {
    MigError::new(MigErrorKind::Persistence)
        .with_op("pgsql")
        .with_message(err.to_string())
}

/// Create a database error from mysql::Error
pub fn from_mysql(err: mysql::Error) -> MigError {
    MigError::new(MigErrorKind::Persistence)
        .with_op("mysql")
        .with_message(err.to_string())
}

/// Create an invalid connection error
pub fn invalid_connection(reason: &str) -> MigError {
    MigError::new(MigErrorKind::InvalidConnection)
        .with_op("ensure_usable")
        .with_message(reason.to_string())
}

/// Create an invalid database URL error
///
/// The URL itself is left out of the message since it may carry a password.
pub fn invalid_url(dialect: &str, reason: impl std::fmt::Display) -> MigError {
    MigError::new(MigErrorKind::InvalidInput)
        .with_op("open_connection")
        .with_message(format!("Invalid {} connection URL: {}", dialect, reason))
}

/// Wrap a failure that happened while applying or committing `migration`
pub fn execution_failed(migration: &Migration, source: MigError) -> MigError {
    MigError::new(MigErrorKind::ExecutionFailed)
        .with_op("apply_migration")
        .with_migration(migration.name())
        .with_version(migration.version())
        .with_message(source.message().to_string())
        .with_source(source)
}
