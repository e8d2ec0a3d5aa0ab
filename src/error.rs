use std::path::PathBuf;
use thiserror::Error;

/// Raised when a field value violates an entity constraint.
///
/// Returned from constructors, setters and the from-storage reconstruction
/// path alike, so a corrupted record fails the same way bad CLI input does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{entity} {field} must be a non-empty string.")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid email address: '{0}'.")]
    InvalidEmail(String),

    #[error("Invalid status '{0}'. Status must be one of ['done', 'in_progress', 'todo'].")]
    InvalidStatus(String),

    #[error("Invalid date '{0}'. due_date must be ISO (YYYY-MM-DD) or ISO datetime.")]
    InvalidDate(String),
}

/// Errors from the JSON file store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("{} does not contain a JSON array", .path.display())]
    NotAnArray { path: PathBuf },

    #[error("malformed record #{index} in {}: {source}", .path.display())]
    Record {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors surfaced by command handlers to the binary.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No such {kind}: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl CommandError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        CommandError::NotFound { kind, key: key.into() }
    }
}
