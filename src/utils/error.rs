//! Error Handling
//!
//! Unified error types for the engine.
//! Uses thiserror for ergonomic error definitions.
//!
//! Every public operation returns a `BankResult` instead of panicking or
//! letting `std::io::Error` leak across the component boundary. Each variant
//! maps to a stable string code via [`BankError::code`] so the protocol
//! layer can report errors without matching on Rust types.

use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum BankError {
    /// Identifier contains `..`, an absolute prefix, or a NUL byte
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Normalized path no longer starts with the configured root
    #[error("Path escapes root: {0}")]
    PathEscape(String),

    /// Identifier is not in the known file type enumeration
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),

    /// File or directory does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Permission denied by the filesystem
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Target already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Transient I/O failure that survived the whole retry budget
    #[error("Transient I/O failure after {attempts} attempts: {message}")]
    TransientExhausted { attempts: u32, message: String },

    /// File I/O errors without a more specific classification
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse errors (frontmatter, timestamps)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Content does not match its type's schema
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal cache invariant violation; fatal to the operation
    #[error("Cache inconsistency: {0}")]
    CacheInconsistency(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a path escape error
    pub fn path_escape(msg: impl Into<String>) -> Self {
        Self::PathEscape(msg.into())
    }

    /// Create an unknown file type error
    pub fn unknown_file_type(msg: impl Into<String>) -> Self {
        Self::UnknownFileType(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a cache inconsistency error
    pub fn cache_inconsistency(msg: impl Into<String>) -> Self {
        Self::CacheInconsistency(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable string code for the protocol layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::PathEscape(_) => "PATH_ESCAPE",
            Self::UnknownFileType(_) => "UNKNOWN_FILE_TYPE",
            Self::NotFound(_) => "ENOENT",
            Self::PermissionDenied(_) => "EACCES",
            Self::AlreadyExists(_) => "EEXIST",
            Self::TransientExhausted { .. } => "TRANSIENT_EXHAUSTED",
            Self::Io(_) => "EIO",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::CacheInconsistency(_) => "CACHE_INCONSISTENCY",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// Convert BankError to a string suitable for protocol-layer responses
impl From<BankError> for String {
    fn from(err: BankError) -> String {
        err.to_string()
    }
}
