//! Core types shared across sqlmig facilities
//!
//! This crate provides foundational types used by the error handling
//! and logging facilities:
//!
//! - **Correlation types**: RunId for tying together the events of one run
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
