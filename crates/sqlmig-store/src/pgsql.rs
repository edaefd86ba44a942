//! PostgreSQL version store and executor

use crate::connection::{sequential_watermark, MigrationConnection, MigrationTransaction};
use crate::errors::{from_postgres, invalid_connection, Result};
use postgres::{Client, Transaction};
use sqlmig_core::{Dialect, Migration};
use std::collections::HashSet;

impl MigrationConnection for Client {
    type Tx<'a> = Transaction<'a>;

    fn dialect(&self) -> Dialect {
        Dialect::Pgsql
    }

    fn ensure_usable(&mut self) -> Result<()> {
        if self.is_closed() {
            return Err(invalid_connection("PostgreSQL connection is closed"));
        }
        Ok(())
    }

    fn current_version(&mut self, repeatable: &HashSet<String>) -> Result<i64> {
        self.batch_execute(Dialect::Pgsql.bookkeeping_ddl())
            .map_err(from_postgres)?;
        let rows = self
            .query(Dialect::Pgsql.applied_in_range_query(), &[])
            .map_err(from_postgres)?
            .iter()
            .map(|row| Ok((row.try_get::<_, i64>(0)?, row.try_get::<_, String>(1)?)))
            .collect::<std::result::Result<Vec<_>, postgres::Error>>()
            .map_err(from_postgres)?;
        Ok(sequential_watermark(rows, repeatable))
    }

    fn begin(&mut self) -> Result<Transaction<'_>> {
        self.transaction().map_err(from_postgres)
    }
}

impl MigrationTransaction for Transaction<'_> {
    fn apply_migration(&mut self, migration: &Migration) -> Result<()> {
        self.batch_execute(migration.sql()?)
            .map_err(from_postgres)?;
        self.execute(
            Dialect::Pgsql.record_applied_sql(),
            &[&migration.version(), &migration.name()],
        )
        .map_err(from_postgres)?;
        Ok(())
    }

    fn commit(self) -> Result<()> {
        Transaction::commit(self).map_err(from_postgres)
    }

    fn rollback(self) -> Result<()> {
        Transaction::rollback(self).map_err(from_postgres)
    }
}
