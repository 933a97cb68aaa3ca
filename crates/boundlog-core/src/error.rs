//! Error types for bounded log files

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while creating, opening or writing a bounded log file.
#[derive(Error, Debug)]
pub enum LogFileError {
    /// The backing file did not exist and could not be created
    #[error("Cannot create log file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but could not be opened for writing
    #[error("Cannot open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Append, truncate or clear failed on an open file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded to, or decoded from, JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The retained-entry cap must be at least one line
    #[error("max_entries must be at least 1")]
    InvalidMaxEntries,
}

/// Result type alias using LogFileError
pub type LogFileResult<T> = Result<T, LogFileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LogFileError::Create {
            path: PathBuf::from("/nope/app.log"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(format!("{}", err), "Cannot create log file /nope/app.log: denied");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: LogFileError = io_err.into();
        assert!(matches!(err, LogFileError::Io(_)));
    }

    #[test]
    fn test_error_from_json_covers_encode_and_decode() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LogFileError = decode.into();
        assert!(matches!(err, LogFileError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));
    }
}
