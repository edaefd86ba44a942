//! Correlation id for a single migration run
//!
//! Every invocation of the engine gets a fresh `RunId` which is attached to
//! the run's start/end events so interleaved logs from several runs (for
//! example one per dialect in CI) can be told apart.

use uuid::Uuid;

/// Unique identifier for one engine run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// Generate a new RunId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
