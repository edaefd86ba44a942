//! Sensitive data marker for automatic redaction
//!
//! Database URLs usually carry credentials. Wrapping them in `Sensitive<T>`
//! keeps them out of `Debug`/`Display` output, including clap's error
//! messages and any `tracing` field they end up in.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use sqlmig_core_types::Sensitive;
///
/// let url = Sensitive::new("postgres://app:hunter2@db/app");
/// assert_eq!(format!("{:?}", url), "***REDACTED***");
/// assert_eq!(format!("{}", url), "***REDACTED***");
///
/// assert_eq!(url.expose(), &"postgres://app:hunter2@db/app");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value, only where it must be used (e.g. to connect)
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Lets `Sensitive<String>` be parsed directly from command line arguments
impl FromStr for Sensitive<String> {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}
