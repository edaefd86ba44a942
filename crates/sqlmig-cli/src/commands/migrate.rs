//! Migrate command
//!
//! Usage: sqlmig migrate --dialect <DIALECT> --migrations <DIR> --database-url <URL>
//!
//! Migrations are read from `<DIR>/<dialect>`, e.g. `<DIR>/pgsql`.

use clap::Args;
use sqlmig_core::errors::{MigError, MigErrorKind, Result};
use sqlmig_core::{Dialect, MigrationResult};
use sqlmig_core_types::Sensitive;
use sqlmig_store::db;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Target database: sqlite, mysql or pgsql
    #[arg(long, env = "SQLMIG_DIALECT")]
    pub dialect: Dialect,

    /// Base migrations directory holding one subdirectory per dialect
    #[arg(long, env = "SQLMIG_MIGRATIONS")]
    pub migrations: PathBuf,

    /// Connection URL, or a file path for SQLite
    #[arg(long, env = "SQLMIG_DATABASE_URL", hide_env_values = true)]
    pub database_url: Sensitive<String>,

    /// Reported to PostgreSQL as the session's application_name
    #[arg(long, default_value = "sqlmig")]
    pub application_name: String,
}

/// Execute migrate command
///
/// Prints the run's `MigrationResult` as JSON on stdout. On failure the
/// all-`-1` sentinel is printed instead and the error is returned.
pub fn execute(args: MigrateArgs) -> Result<()> {
    match migrate(&args) {
        Ok(result) => print_result(&result),
        Err(e) => {
            tracing::error!(
                err_code = e.code(),
                dialect = args.dialect.name(),
                "Migration run failed: {}",
                e
            );
            print_result(&MigrationResult::failed())?;
            Err(e)
        }
    }
}

fn migrate(args: &MigrateArgs) -> Result<MigrationResult> {
    if !args.migrations.exists() {
        return Err(MigError::new(MigErrorKind::InvalidInput)
            .with_op("migrate")
            .with_message("Migration base path doesn't exist."));
    }
    let base_path = args.migrations.join(args.dialect.name());

    let mut conn = db::open(args.dialect, &args.database_url, &args.application_name)?;
    sqlmig_engine::run(&mut conn, base_path)
}

fn print_result(result: &MigrationResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(|e| {
        MigError::new(MigErrorKind::Serialization)
            .with_op("print_result")
            .with_message(e.to_string())
    })?;
    println!("{}", json);
    Ok(())
}
