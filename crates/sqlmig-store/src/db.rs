//! Database connection management
//!
//! Opens a connection for any supported dialect from a URL. SQLite accepts a
//! plain file path, `:memory:`, or a `sqlite://` prefixed path.

use crate::any::DbConnection;
use crate::errors::{from_mysql, from_postgres, from_rusqlite, invalid_url, Result};
use rusqlite::Connection;
use sqlmig_core::Dialect;
use sqlmig_core_types::Sensitive;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open_sqlite<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure_sqlite(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_sqlite_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure_sqlite(&conn)?;
    Ok(conn)
}

fn configure_sqlite(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)
}

/// Connect to PostgreSQL, tagging the session with `application_name`
pub fn open_pgsql(url: &str, application_name: &str) -> Result<postgres::Client> {
    let mut config = url
        .parse::<postgres::Config>()
        .map_err(|e| invalid_url("pgsql", e))?;
    config.application_name(application_name);
    config.connect(postgres::NoTls).map_err(from_postgres)
}

/// Connect to MySQL
pub fn open_mysql(url: &str) -> Result<mysql::Conn> {
    let opts = mysql::Opts::from_url(url).map_err(|e| invalid_url("mysql", e))?;
    mysql::Conn::new(opts).map_err(from_mysql)
}

/// Open a connection for `dialect`
///
/// # Errors
///
/// `InvalidInput` if the URL cannot be parsed, `Persistence` if the server
/// cannot be reached or the file cannot be opened.
pub fn open(
    dialect: Dialect,
    url: &Sensitive<String>,
    application_name: &str,
) -> Result<DbConnection> {
    let url = url.expose().as_str();
    tracing::debug!(dialect = %dialect, "Opening database connection");
    Ok(match dialect {
        Dialect::Sqlite => DbConnection::Sqlite(open_sqlite(sqlite_path(url))?),
        Dialect::Mysql => DbConnection::Mysql(open_mysql(url)?),
        Dialect::Pgsql => DbConnection::Pgsql(open_pgsql(url, application_name)?),
    })
}

fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}
