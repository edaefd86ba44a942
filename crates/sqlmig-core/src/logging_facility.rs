//! Structured logging facility for sqlmig
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Progress and failure notices of a migration run are ordinary `tracing`
//! events; nothing in the engine writes to stdout directly.
//!
//! # Usage
//!
//! ```rust
//! use sqlmig_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
