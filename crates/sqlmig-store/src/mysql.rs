//! MySQL version store and executor
//!
//! MySQL commits implicitly around most DDL, so a migration that mixes DDL
//! with other statements is only partly undone by a rollback.

use crate::connection::{sequential_watermark, MigrationConnection, MigrationTransaction};
use crate::errors::{from_mysql, invalid_connection, Result};
use mysql::prelude::Queryable;
use mysql::{Conn, Transaction, TxOpts};
use sqlmig_core::{Dialect, Migration};
use std::collections::HashSet;

impl MigrationConnection for Conn {
    type Tx<'a> = Transaction<'a>;

    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn ensure_usable(&mut self) -> Result<()> {
        self.query_drop("SELECT 1").map_err(|e| {
            invalid_connection(&format!("MySQL connection is not usable: {}", e))
        })
    }

    fn current_version(&mut self, repeatable: &HashSet<String>) -> Result<i64> {
        self.query_drop(Dialect::Mysql.bookkeeping_ddl())
            .map_err(from_mysql)?;
        let rows = self
            .query::<(i64, String), _>(Dialect::Mysql.applied_in_range_query())
            .map_err(from_mysql)?;
        Ok(sequential_watermark(rows, repeatable))
    }

    fn begin(&mut self) -> Result<Transaction<'_>> {
        self.start_transaction(TxOpts::default())
            .map_err(from_mysql)
    }
}

impl MigrationTransaction for Transaction<'_> {
    fn apply_migration(&mut self, migration: &Migration) -> Result<()> {
        self.query_drop(migration.sql()?).map_err(from_mysql)?;
        self.exec_drop(
            Dialect::Mysql.record_applied_sql(),
            (migration.version(), migration.name().to_owned()),
        )
        .map_err(from_mysql)
    }

    fn commit(self) -> Result<()> {
        Transaction::commit(self).map_err(from_mysql)
    }

    fn rollback(self) -> Result<()> {
        Transaction::rollback(self).map_err(from_mysql)
    }
}
