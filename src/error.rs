use thiserror::Error;

/// Errors that can arise while interacting with the storage layer.
///
/// The storage layer never swallows or retries: every failure surfaces as
/// one of these variants and the caller decides whether to retry, log, or
/// answer with a "system busy" message.
#[derive(Debug, Error)]
pub enum StoreError {
    /// On-disk content could not be parsed as the expected format at load time.
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// The cross-process lock could not be acquired within the timeout.
    /// Transient; the caller may retry.
    #[error("lock on {path} not acquired within {waited_ms}ms")]
    LockTimeout { path: String, waited_ms: u64 },

    /// A required key was read without a default.
    #[error("section [{section}] has no key '{key}'")]
    KeyNotFound { section: String, key: String },

    /// A validated document update carried a value of the wrong kind.
    #[error("value at '{path}' should be {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A dotted-path write ran into an intermediate node that is not a mapping.
    #[error("path '{path}' blocked at '{segment}': not a mapping")]
    PathConflict { path: String, segment: String },

    /// A dotted path was empty.
    #[error("dotted path must not be empty")]
    EmptyPath,

    /// A caller-supplied subdir or file name failed path validation.
    #[error("invalid path component: {0}")]
    InvalidName(String),

    /// Lookup of an account that has no record at all.
    #[error("account '{0}' not found")]
    AccountNotFound(String),

    /// Lookup of a per-account record that does not exist.
    #[error("account '{account}' has no record for '{name}'")]
    RecordNotFound { account: String, name: String },

    /// A caller-supplied value failed a domain check (e.g. a non-positive
    /// weight).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Wrapper around IO errors (temp file creation, rename, fsync, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn load(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        StoreError::Load {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
