//! Supported SQL dialects and their bookkeeping SQL
//!
//! The dialect set is closed. Each variant owns the three statements the
//! engine needs: create the bookkeeping table, read the watermark, and record
//! an applied migration. The table has the same logical shape everywhere:
//! `(version BIGINT, name TEXT, performed TIMESTAMP DEFAULT now)` keyed by
//! `(version, name)`.
//!
//! Repeatable migrations write bookkeeping rows too. The watermark read only
//! fetches rows inside the sequential version range, which drops unprefixed
//! and small-prefix repeatables. A repeatable carrying a full 14-digit prefix
//! still lands in range, so the store filters those out by name.

use crate::errors::{MigError, MigErrorKind};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Target database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sqlite,
    Mysql,
    Pgsql,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Sqlite, Dialect::Mysql, Dialect::Pgsql];

    /// Lower-case name, also the per-dialect migrations directory name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Pgsql => "pgsql",
        }
    }

    /// Idempotent bookkeeping table creation
    pub fn bookkeeping_ddl(&self) -> &'static str {
        match self {
            Dialect::Sqlite => {
                "CREATE TABLE IF NOT EXISTS [migrations] (
                    [version]   INTEGER  NOT NULL,
                    [performed] DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    [name]      TEXT     NOT NULL,
                    CONSTRAINT migrations_pk PRIMARY KEY ([version], [name])
                )"
            }
            Dialect::Mysql => {
                "CREATE TABLE IF NOT EXISTS `migrations` (
                    `version`   bigint       NOT NULL,
                    `performed` timestamp    NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    `name`      varchar(255) NOT NULL,
                    PRIMARY KEY (`version`, `name`)
                )"
            }
            Dialect::Pgsql => {
                r#"CREATE TABLE IF NOT EXISTS migrations (
                    "version"   bigint    NOT NULL,
                    "performed" timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    "name"      text      NOT NULL,
                    PRIMARY KEY ("version", "name")
                )"#
            }
        }
    }

    /// `(version, name)` of every bookkeeping row inside the sequential range
    pub fn applied_in_range_query(&self) -> &'static str {
        match self {
            Dialect::Sqlite => {
                "SELECT [version], [name] FROM [migrations]
                 WHERE [version] BETWEEN 20000000000000 AND 99999999999999"
            }
            Dialect::Mysql => {
                "SELECT `version`, `name` FROM `migrations`
                 WHERE `version` BETWEEN 20000000000000 AND 99999999999999"
            }
            Dialect::Pgsql => {
                r#"SELECT "version", "name" FROM migrations
                 WHERE "version" BETWEEN 20000000000000 AND 99999999999999"#
            }
        }
    }

    /// Upsert of `(version, name)`; a conflict refreshes `performed`
    ///
    /// Takes two positional parameters: version then name.
    pub fn record_applied_sql(&self) -> &'static str {
        match self {
            Dialect::Sqlite => {
                "INSERT INTO [migrations] ([version], [name]) VALUES (?1, ?2)
                 ON CONFLICT ([version], [name]) DO UPDATE SET [performed] = CURRENT_TIMESTAMP"
            }
            Dialect::Mysql => {
                "INSERT INTO `migrations` (`version`, `name`) VALUES (?, ?)
                 ON DUPLICATE KEY UPDATE `performed` = CURRENT_TIMESTAMP"
            }
            Dialect::Pgsql => {
                r#"INSERT INTO migrations ("version", "name") VALUES ($1, $2)
                 ON CONFLICT ("version", "name") DO UPDATE SET performed = CURRENT_TIMESTAMP"#
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = MigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::Mysql),
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::Pgsql),
            _ => Err(MigError::new(MigErrorKind::UnsupportedDialect)
                .with_op("parse_dialect")
                .with_message(format!(
                    "Unsupported database type '{}' (expected sqlite, mysql or pgsql)",
                    s
                ))),
        }
    }
}
