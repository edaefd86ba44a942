//! sqlmig Engine - Orchestration layer
//!
//! Drives one migration run: read the watermark, discover what is eligible,
//! then apply each migration in its own transaction.

pub mod commands;

pub use commands::migrate::run;
