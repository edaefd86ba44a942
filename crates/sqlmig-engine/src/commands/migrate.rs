//! The migration run
//!
//! ## Logging Ownership
//!
//! This module owns lifecycle logging for a run:
//! - `log_op_start!` / `log_op_end!` / `log_op_error!` around `migrate_run`
//! - an info event before each sequential migration
//! - an error event naming the migration that failed
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

use sqlmig_core::discovery::{discover, repeatable_names};
use sqlmig_core::errors::{MigError, Result};
use sqlmig_core::{log_op_end, log_op_error, log_op_start, Migration, MigrationResult};
use sqlmig_core_types::schema::{OP_APPLY, OP_DISCOVER, OP_READ_WATERMARK, OP_RUN};
use sqlmig_core_types::RunId;
use sqlmig_store::errors::execution_failed;
use sqlmig_store::{MigrationConnection, MigrationTransaction};
use std::path::Path;
use std::time::Instant;

/// Bring the database behind `conn` up to date with the migrations under
/// `base_path`
///
/// `base_path` is the dialect-specific directory holding `repeatable_before`,
/// `sequential` and `repeatable_after`. Migrations run in discovery order,
/// one transaction each. The first failure is rolled back and returned; what
/// committed before it stays committed.
///
/// ## Errors
///
/// - `InvalidConnection`: the connection cannot run migrations
/// - `Persistence`: bookkeeping table or watermark read failed
/// - `MigrationFormat`: a sequential file is misnamed; nothing has run
/// - `Io`: a migrations subdirectory cannot be listed
/// - `ExecutionFailed`: a migration failed; its name and version are attached
pub fn run<C: MigrationConnection>(
    conn: &mut C,
    base_path: impl AsRef<Path>,
) -> Result<MigrationResult> {
    let base_path = base_path.as_ref();
    let run_id = RunId::new();
    let started = Instant::now();
    log_op_start!(
        OP_RUN,
        run_id,
        dialect = conn.dialect().name(),
        base_path = %base_path.display()
    );

    let result = run_impl(conn, base_path).map_err(|e| {
        log_op_error!(OP_RUN, run_id, started, e);
        e
    })?;

    log_op_end!(
        OP_RUN,
        run_id,
        started,
        previous_version = result.previous_version,
        current_version = result.current_version,
        repeatable_count = result.repeatable_count,
        sequential_count = result.sequential_count
    );

    Ok(result)
}

fn run_impl<C: MigrationConnection>(conn: &mut C, base_path: &Path) -> Result<MigrationResult> {
    conn.ensure_usable()?;

    let repeatable = repeatable_names(base_path)?;
    let previous_version = conn.current_version(&repeatable)?;
    tracing::debug!(
        op = OP_READ_WATERMARK,
        current_version = previous_version,
        "Read migration watermark"
    );

    let migrations = discover(base_path, previous_version)?;
    tracing::debug!(
        op = OP_DISCOVER,
        eligible = migrations.len(),
        "Discovered eligible migrations"
    );

    let mut result = MigrationResult {
        previous_version,
        current_version: previous_version,
        repeatable_count: 0,
        sequential_count: 0,
    };

    for migration in &migrations {
        apply_one(conn, migration)?;

        if migration.is_repeatable() {
            result.repeatable_count += 1;
        } else {
            result.current_version = migration.version();
            result.sequential_count += 1;
        }
    }

    Ok(result)
}

/// Apply a single migration in its own transaction
fn apply_one<C: MigrationConnection>(conn: &mut C, migration: &Migration) -> Result<()> {
    let mut tx = conn.begin().map_err(|e| failed(migration, e))?;

    if !migration.is_repeatable() {
        tracing::info!(
            op = OP_APPLY,
            migration = migration.name(),
            version = migration.version(),
            "Running migration {} ({})",
            migration.version(),
            migration.name()
        );
    }

    match tx.apply_migration(migration) {
        Ok(()) => tx.commit().map_err(|e| failed(migration, e)),
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(
                    op = OP_APPLY,
                    migration = migration.name(),
                    error = %rollback_err,
                    "Rollback failed"
                );
            }
            Err(failed(migration, e))
        }
    }
}

fn failed(migration: &Migration, source: MigError) -> MigError {
    tracing::error!(
        op = OP_APPLY,
        migration = migration.name(),
        version = migration.version(),
        err_code = source.code(),
        "Error in migration '{}':\n{}",
        migration.name(),
        source.message()
    );
    execution_failed(migration, source)
}
