//! The seam between the migration engine and a database driver
//!
//! A connection owns bookkeeping (create the `migrations` table, read the
//! watermark) and hands out transactions. A transaction runs one migration's
//! SQL together with its bookkeeping row, and is then committed or rolled
//! back as a unit.

use crate::errors::Result;
use sqlmig_core::discovery::UNVERSIONED;
use sqlmig_core::{Dialect, Migration};
use std::collections::HashSet;

/// A live database connection the engine can migrate
pub trait MigrationConnection {
    type Tx<'a>: MigrationTransaction
    where
        Self: 'a;

    fn dialect(&self) -> Dialect;

    /// Check that the connection can run migrations right now
    ///
    /// # Errors
    ///
    /// `InvalidConnection` if the connection is closed, unreachable, or
    /// already inside a transaction the engine does not own.
    fn ensure_usable(&mut self) -> Result<()>;

    /// Create the bookkeeping table if needed and return the highest applied
    /// sequential version, or `-1` if none has been applied
    ///
    /// Rows named in `repeatable` belong to repeatable migrations and are
    /// skipped whatever their version.
    ///
    /// # Errors
    ///
    /// `Persistence` if the table cannot be created or read.
    fn current_version(&mut self, repeatable: &HashSet<String>) -> Result<i64>;

    /// Open a transaction for one migration
    ///
    /// # Errors
    ///
    /// `Persistence` if the driver refuses to start a transaction.
    fn begin(&mut self) -> Result<Self::Tx<'_>>;
}

/// One migration's unit of work
pub trait MigrationTransaction {
    /// Run the migration's SQL, then upsert its `(version, name)` row
    ///
    /// # Errors
    ///
    /// `Io` if the SQL file cannot be read, `Persistence` if the SQL or the
    /// bookkeeping write fails.
    fn apply_migration(&mut self, migration: &Migration) -> Result<()>;

    /// # Errors
    ///
    /// `Persistence` if the commit fails.
    fn commit(self) -> Result<()>;

    /// # Errors
    ///
    /// `Persistence` if the rollback fails.
    fn rollback(self) -> Result<()>;
}

/// Highest version among in-range bookkeeping rows not named in `repeatable`
pub(crate) fn sequential_watermark<I>(rows: I, repeatable: &HashSet<String>) -> i64
where
    I: IntoIterator<Item = (i64, String)>,
{
    rows.into_iter()
        .filter(|(_, name)| !repeatable.contains(name))
        .map(|(version, _)| version)
        .max()
        .unwrap_or(UNVERSIONED)
}
