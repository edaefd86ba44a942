//! sqlmig Core - migration model, discovery and shared facilities
//!
//! This crate holds everything about a migration run that does not need a
//! database connection:
//! - The `Migration` record with lazily loaded SQL text, and `MigrationResult`
//! - Discovery of eligible migrations from the `repeatable_before` /
//!   `sequential` / `repeatable_after` directory layout
//! - The closed set of supported SQL dialects and their bookkeeping SQL
//! - The canonical error facility and the structured logging facility

pub mod dialect;
pub mod discovery;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use dialect::Dialect;
pub use discovery::discover;
pub use errors::{MigError, MigErrorKind, MigrationError, Result};
pub use model::{Migration, MigrationResult};

#[doc(hidden)]
pub mod __private {
    pub use sqlmig_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
    pub use tracing;
}
