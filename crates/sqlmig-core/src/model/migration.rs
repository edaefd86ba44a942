//! A single migration file

use crate::errors::{MigrationError, Result};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Immutable description of one migration
///
/// Records are built fresh by discovery on every run. The SQL text is read
/// from `path` on the first call to [`Migration::sql`] and then kept for the
/// lifetime of the record.
#[derive(Debug, Clone)]
pub struct Migration {
    version: i64,
    name: String,
    path: PathBuf,
    is_repeatable: bool,
    sql: OnceCell<String>,
}

impl Migration {
    /// Describe a migration backed by a file; nothing is read yet
    pub fn new(
        version: i64,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        is_repeatable: bool,
    ) -> Self {
        Self {
            version,
            name: name.into(),
            path: path.into(),
            is_repeatable,
            sql: OnceCell::new(),
        }
    }

    /// Describe a migration whose SQL is supplied up front instead of read from disk
    pub fn with_sql(
        version: i64,
        name: impl Into<String>,
        sql: impl Into<String>,
        is_repeatable: bool,
    ) -> Self {
        Self {
            version,
            name: name.into(),
            path: PathBuf::new(),
            is_repeatable,
            sql: OnceCell::with_value(sql.into()),
        }
    }

    /// Ordering key; `-1` for repeatable files without a numeric prefix
    pub fn version(&self) -> i64 {
        self.version
    }

    /// File base name, half of the bookkeeping key
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_repeatable(&self) -> bool {
        self.is_repeatable
    }

    /// The migration's SQL text, read from disk on first access
    ///
    /// # Errors
    ///
    /// Returns an `Io` error naming the migration if the file cannot be read.
    /// A failed read is not cached; the next call tries again.
    pub fn sql(&self) -> Result<&str> {
        self.sql
            .get_or_try_init(|| {
                std::fs::read_to_string(&self.path).map_err(|source| {
                    MigrationError::SqlUnreadable {
                        name: self.name.clone(),
                        path: self.path.clone(),
                        source,
                    }
                })
            })
            .map(String::as_str)
            .map_err(Into::into)
    }

    /// Whether the SQL text has been loaded already
    pub fn is_loaded(&self) -> bool {
        self.sql.get().is_some()
    }
}
