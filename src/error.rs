//! Error types for the emoji panel.
//!
//! Almost every failure in the panel is recoverable: the dataset falls back
//! to a built-in list, usage tracking continues in memory, and settings fall
//! back to defaults. These variants exist so the fallible building blocks
//! can report what went wrong before the caller decides how to degrade.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for emoji panel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for emoji panel operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset file could not be read or parsed as a whole.
    #[error("failed to load emoji dataset from {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// A single dataset entry was malformed and has been dropped.
    #[error("invalid dataset entry #{index}: {reason}")]
    EntryValidation { index: usize, reason: String },

    /// Persisted state could not be read or decoded.
    #[error("failed to read persisted value `{key}`: {reason}")]
    PersistenceRead { key: String, reason: String },

    /// Persisted state could not be written.
    #[error("failed to write persisted value `{key}`: {reason}")]
    PersistenceWrite { key: String, reason: String },

    /// Stored settings were invalid.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// Clipboard collaborator failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// I/O error from file-backed storage.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a [`Error::DataLoad`] from any displayable cause.
    pub fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::PersistenceRead`] from any displayable cause.
    pub fn read(key: &str, reason: impl ToString) -> Self {
        Self::PersistenceRead {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`Error::PersistenceWrite`] from any displayable cause.
    pub fn write(key: &str, reason: impl ToString) -> Self {
        Self::PersistenceWrite {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::data_load("/tmp/emoji.json", "unexpected EOF");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/emoji.json"));
        assert!(msg.contains("unexpected EOF"));

        let err = Error::EntryValidation {
            index: 7,
            reason: "missing emoji".to_string(),
        };
        assert!(err.to_string().contains("#7"));

        let err = Error::write("emoji-usage", "disk full");
        assert!(err.to_string().contains("`emoji-usage`"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
