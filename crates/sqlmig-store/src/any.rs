//! A connection to any supported dialect, chosen at runtime

use crate::connection::{MigrationConnection, MigrationTransaction};
use crate::errors::Result;
use sqlmig_core::{Dialect, Migration};
use std::collections::HashSet;

/// One live connection per supported dialect
pub enum DbConnection {
    Sqlite(rusqlite::Connection),
    Mysql(mysql::Conn),
    Pgsql(postgres::Client),
}

/// Transaction borrowed from a [`DbConnection`]
pub enum DbTransaction<'a> {
    Sqlite(rusqlite::Transaction<'a>),
    Mysql(mysql::Transaction<'a>),
    Pgsql(postgres::Transaction<'a>),
}

impl MigrationConnection for DbConnection {
    type Tx<'a> = DbTransaction<'a>;

    fn dialect(&self) -> Dialect {
        match self {
            DbConnection::Sqlite(conn) => conn.dialect(),
            DbConnection::Mysql(conn) => conn.dialect(),
            DbConnection::Pgsql(conn) => conn.dialect(),
        }
    }

    fn ensure_usable(&mut self) -> Result<()> {
        match self {
            DbConnection::Sqlite(conn) => conn.ensure_usable(),
            DbConnection::Mysql(conn) => conn.ensure_usable(),
            DbConnection::Pgsql(conn) => conn.ensure_usable(),
        }
    }

    fn current_version(&mut self, repeatable: &HashSet<String>) -> Result<i64> {
        match self {
            DbConnection::Sqlite(conn) => conn.current_version(repeatable),
            DbConnection::Mysql(conn) => conn.current_version(repeatable),
            DbConnection::Pgsql(conn) => conn.current_version(repeatable),
        }
    }

    fn begin(&mut self) -> Result<DbTransaction<'_>> {
        Ok(match self {
            DbConnection::Sqlite(conn) => DbTransaction::Sqlite(conn.begin()?),
            DbConnection::Mysql(conn) => DbTransaction::Mysql(conn.begin()?),
            DbConnection::Pgsql(conn) => DbTransaction::Pgsql(conn.begin()?),
        })
    }
}

impl MigrationTransaction for DbTransaction<'_> {
    fn apply_migration(&mut self, migration: &Migration) -> Result<()> {
        match self {
            DbTransaction::Sqlite(tx) => tx.apply_migration(migration),
            DbTransaction::Mysql(tx) => tx.apply_migration(migration),
            DbTransaction::Pgsql(tx) => tx.apply_migration(migration),
        }
    }

    fn commit(self) -> Result<()> {
        match self {
            DbTransaction::Sqlite(tx) => MigrationTransaction::commit(tx),
            DbTransaction::Mysql(tx) => MigrationTransaction::commit(tx),
            DbTransaction::Pgsql(tx) => MigrationTransaction::commit(tx),
        }
    }

    fn rollback(self) -> Result<()> {
        match self {
            DbTransaction::Sqlite(tx) => MigrationTransaction::rollback(tx),
            DbTransaction::Mysql(tx) => MigrationTransaction::rollback(tx),
            DbTransaction::Pgsql(tx) => MigrationTransaction::rollback(tx),
        }
    }
}

impl From<rusqlite::Connection> for DbConnection {
    fn from(conn: rusqlite::Connection) -> Self {
        DbConnection::Sqlite(conn)
    }
}

impl From<mysql::Conn> for DbConnection {
    fn from(conn: mysql::Conn) -> Self {
        DbConnection::Mysql(conn)
    }
}

impl From<postgres::Client> for DbConnection {
    fn from(client: postgres::Client) -> Self {
        DbConnection::Pgsql(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_variant_delegates() {
        let mut conn = DbConnection::from(rusqlite::Connection::open_in_memory().unwrap());
        assert_eq!(conn.dialect(), Dialect::Sqlite);
        conn.ensure_usable().unwrap();
        assert_eq!(conn.current_version(&HashSet::new()).unwrap(), -1);

        let mut tx = conn.begin().unwrap();
        tx.apply_migration(&Migration::with_sql(
            20221029000000,
            "20221029000000_init.sql",
            "CREATE TABLE t (a INTEGER);",
            false,
        ))
        .unwrap();
        tx.commit().unwrap();

        assert_eq!(conn.current_version(&HashSet::new()).unwrap(), 20221029000000);
    }
}
