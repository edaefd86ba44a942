//! Canonical schema constants for structured logging
//!
//! `tracing` field names must be identifiers at the call site, so these
//! constants are what tests and log consumers match against.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_DIALECT: &str = "dialect";
pub const FIELD_BASE_PATH: &str = "base_path";

// Migration identity
pub const FIELD_MIGRATION: &str = "migration";
pub const FIELD_VERSION: &str = "version";

// Run summary
pub const FIELD_PREVIOUS_VERSION: &str = "previous_version";
pub const FIELD_CURRENT_VERSION: &str = "current_version";
pub const FIELD_REPEATABLE_COUNT: &str = "repeatable_count";
pub const FIELD_SEQUENTIAL_COUNT: &str = "sequential_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERROR: &str = "error";

// Canonical operation names
pub const OP_RUN: &str = "migrate_run";
pub const OP_READ_WATERMARK: &str = "read_watermark";
pub const OP_DISCOVER: &str = "discover";
pub const OP_APPLY: &str = "apply_migration";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
