//! Error types for pulsar-params
//!
//! Every failure carries a message naming the offending key, file or line.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value or argument has an unsupported kind
    Type,
    /// A key, or its uncertainty companion, does not exist
    NotFound,
    /// An uncertainty was requested for a kind that cannot carry one
    UnsupportedOperation,
    /// Reading or writing a parameter file failed
    Io,
    /// A store invariant was violated (should be unreachable)
    Internal,
}

/// pulsar-params error types
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported value type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Missing key or missing uncertainty value
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uncertainty requested for a text or integer parameter
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Malformed line in a parameter file
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// A parameter file could not be loaded
    #[error("Problem reading in pulsar parameter file '{}': {reason}", path.display())]
    ParFile {
        /// File that failed to load
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store invariant violation (critical bug)
    #[error("Internal error: {0}\nThe parameter store is inconsistent. Please report this issue.")]
    Internal(String),
}

impl Error {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeError(_) => ErrorKind::Type,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            Self::Parse { .. } | Self::ParFile { .. } | Self::Io(_) => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
