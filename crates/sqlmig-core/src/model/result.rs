//! Summary of one engine run

use serde::Serialize;

/// Outcome of a migration run
///
/// `current_version` is the highest sequential version committed during the
/// run, or `previous_version` when none ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub previous_version: i64,
    pub current_version: i64,
    pub repeatable_count: i32,
    pub sequential_count: i32,
}

impl MigrationResult {
    /// Sentinel for "failed before any version could be determined"
    pub fn failed() -> Self {
        Self {
            previous_version: -1,
            current_version: -1,
            repeatable_count: -1,
            sequential_count: -1,
        }
    }
}
