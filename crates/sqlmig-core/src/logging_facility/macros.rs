//! Run lifecycle macros
//!
//! A run logs `start`, then exactly one of `end` or `end_error`, all under
//! the same `op` and `run_id`. `duration_ms` is taken from the `Instant` the
//! operation started at, so callers never compute it by hand. Extra fields
//! follow the usual `tracing` syntax.
//!
//! The expansions go through `$crate::__private`, so a caller needs only
//! `sqlmig_core` in scope.

/// Announce the start of a run-scoped operation
///
/// # Example
///
/// ```
/// # use sqlmig_core::log_op_start;
/// log_op_start!("migrate_run", "run-1");
/// log_op_start!("migrate_run", "run-1", dialect = "sqlite");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, $run_id:expr $(, $($field:tt)+)?) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::EVENT_START,
            run_id = %$run_id,
            $($($field)+)?
        )
    };
}

/// Close a run-scoped operation that succeeded
///
/// # Example
///
/// ```
/// # use sqlmig_core::log_op_end;
/// let started = std::time::Instant::now();
/// log_op_end!("migrate_run", "run-1", started, sequential_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, $run_id:expr, $started:expr $(, $($field:tt)+)?) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::EVENT_END,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            $($($field)+)?
        )
    };
}

/// Close a run-scoped operation that failed
///
/// `$err` is borrowed, never consumed; it must be a `MigError`.
///
/// # Example
///
/// ```
/// # use sqlmig_core::log_op_error;
/// # use sqlmig_core::errors::{MigError, MigErrorKind};
/// let started = std::time::Instant::now();
/// let err = MigError::new(MigErrorKind::ExecutionFailed).with_message("boom");
/// log_op_error!("migrate_run", "run-1", started, err);
/// assert_eq!(err.message(), "boom");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $run_id:expr, $started:expr, $err:expr $(, $($field:tt)+)?) => {{
        let err: &$crate::errors::MigError = &$err;
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::EVENT_END_ERROR,
            run_id = %$run_id,
            duration_ms = $started.elapsed().as_millis() as u64,
            err_kind = ?err.kind(),
            err_code = err.code(),
            error = %err,
            $($($field)+)?
        )
    }};
}
