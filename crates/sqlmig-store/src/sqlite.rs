//! SQLite version store and executor

use crate::connection::{sequential_watermark, MigrationConnection, MigrationTransaction};
use crate::errors::{from_rusqlite, invalid_connection, Result};
use rusqlite::{params, Connection, Transaction};
use sqlmig_core::{Dialect, Migration};
use std::collections::HashSet;

impl MigrationConnection for Connection {
    type Tx<'a> = Transaction<'a>;

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn ensure_usable(&mut self) -> Result<()> {
        if !self.is_autocommit() {
            return Err(invalid_connection(
                "SQLite connection already has an open transaction",
            ));
        }
        Ok(())
    }

    fn current_version(&mut self, repeatable: &HashSet<String>) -> Result<i64> {
        self.execute_batch(Dialect::Sqlite.bookkeeping_ddl())
            .map_err(from_rusqlite)?;
        let mut stmt = self
            .prepare(Dialect::Sqlite.applied_in_range_query())
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<(i64, String)>>>())
            .map_err(from_rusqlite)?;
        Ok(sequential_watermark(rows, repeatable))
    }

    fn begin(&mut self) -> Result<Transaction<'_>> {
        self.transaction().map_err(from_rusqlite)
    }
}

impl MigrationTransaction for Transaction<'_> {
    fn apply_migration(&mut self, migration: &Migration) -> Result<()> {
        self.execute_batch(migration.sql()?)
            .map_err(from_rusqlite)?;
        self.execute(
            Dialect::Sqlite.record_applied_sql(),
            params![migration.version(), migration.name()],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    fn commit(self) -> Result<()> {
        Transaction::commit(self).map_err(from_rusqlite)
    }

    fn rollback(self) -> Result<()> {
        Transaction::rollback(self).map_err(from_rusqlite)
    }
}
