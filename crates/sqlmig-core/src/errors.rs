use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MigError
pub type Result<T> = std::result::Result<T, MigError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error surfaced by sqlmig carries one of these kinds. Each kind maps
/// to a stable error code that callers (and the CLI's JSON output) can match
/// on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigErrorKind {
    /// Caller supplied something unusable (missing base path, bad URL)
    InvalidInput,
    /// A migration file name breaks the naming convention
    MigrationFormat,
    /// The connection handed to the engine cannot run migrations
    InvalidConnection,
    /// A migration body or its bookkeeping write failed
    ExecutionFailed,
    /// Bookkeeping table bootstrap, watermark read or transaction control failed
    Persistence,
    Io,
    UnsupportedDialect,
    Serialization,
}

impl MigErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            MigErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            MigErrorKind::MigrationFormat => "ERR_MIGRATION_FORMAT",
            MigErrorKind::InvalidConnection => "ERR_INVALID_CONNECTION",
            MigErrorKind::ExecutionFailed => "ERR_EXECUTION_FAILED",
            MigErrorKind::Persistence => "ERR_PERSISTENCE",
            MigErrorKind::Io => "ERR_IO",
            MigErrorKind::UnsupportedDialect => "ERR_UNSUPPORTED_DIALECT",
            MigErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// context needed to diagnose a failed run: the operation, the migration
/// being applied, and for aggregated naming errors the offending files.
#[derive(Debug, Clone)]
pub struct MigError {
    kind: MigErrorKind,
    op: Option<String>,
    migration: Option<String>,
    version: Option<i64>,
    message: String,
    source: Option<Box<MigError>>,
    offenders: Option<Vec<String>>,
}

impl MigError {
    /// Create a new error with the specified kind
    pub fn new(kind: MigErrorKind) -> Self {
        Self {
            kind,
            op: None,
            migration: None,
            version: None,
            message: String::new(),
            source: None,
            offenders: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the migration the error belongs to
    pub fn with_migration(mut self, name: impl Into<String>) -> Self {
        self.migration = Some(name.into());
        self
    }

    /// Add the version of the migration the error belongs to
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: MigError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add the file names that caused an aggregated format error
    pub fn with_offenders(mut self, files: Vec<String>) -> Self {
        self.offenders = Some(files);
        self
    }

    pub fn kind(&self) -> MigErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn migration(&self) -> Option<&str> {
        self.migration.as_deref()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&MigError> {
        self.source.as_deref()
    }

    /// Offending file names, populated on aggregated `MigrationFormat` errors
    pub fn offenders(&self) -> Option<&[String]> {
        self.offenders.as_deref()
    }
}

impl std::fmt::Display for MigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(migration) = &self.migration {
            write!(f, " (migration: {})", migration)?;
        }
        Ok(())
    }
}

impl std::error::Error for MigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while discovering and loading migrations
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Sequential files without a leading `<digits>_`
    #[error("Sequential migration filenames do not meet expected naming convention (yyyymmddhhmmss_description-here.sql):\n{}", offender_lines(.files))]
    MissingVersionPrefix { files: Vec<String> },

    /// Numeric prefix too large for a 64-bit version
    #[error("Migration filename has a version prefix that does not fit in 64 bits: {file}")]
    UnparsableVersion { file: String },

    /// Sequential versions outside the 14-digit timestamp range
    #[error("Incorrectly named migrations found:\n{}", offender_lines(.files))]
    VersionOutOfRange { files: Vec<String> },

    #[error("Failed to read SQL for migration {name} from {}: {source}", .path.display())]
    SqlUnreadable {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read migration directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn offender_lines(files: &[String]) -> String {
    files.iter().map(|f| format!("{}\n", f)).collect()
}

/// Conversion from MigrationError to MigError
impl From<MigrationError> for MigError {
    fn from(err: MigrationError) -> Self {
        let message = err.to_string();
        match err {
            MigrationError::UnparsableVersion { file } => {
                MigError::new(MigErrorKind::MigrationFormat)
                    .with_op("discover")
                    .with_message(message)
                    .with_offenders(vec![file])
            }
            MigrationError::MissingVersionPrefix { files }
            | MigrationError::VersionOutOfRange { files } => {
                MigError::new(MigErrorKind::MigrationFormat)
                    .with_op("discover")
                    .with_message(message)
                    .with_offenders(files)
            }
            MigrationError::SqlUnreadable { name, .. } => MigError::new(MigErrorKind::Io)
                .with_op("load_sql")
                .with_migration(name)
                .with_message(message),
            MigrationError::DirectoryUnreadable { .. } => MigError::new(MigErrorKind::Io)
                .with_op("discover")
                .with_message(message),
        }
    }
}
