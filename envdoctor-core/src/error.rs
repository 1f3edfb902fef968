//! Typed error handling for envdoctor.
//!
//! Per-file failures (source read, parse, declaration read) are recoverable and get
//! recorded on the report; a traversal failure on the scan root is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for envdoctor operations.
#[derive(Error, Debug)]
pub enum EnvDoctorError {
    /// I/O error when reading a file
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Source file could not be parsed under any supported dialect
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Declaration (.env) file could not be read
    #[error("Declaration file error at {path}: {message}")]
    Declaration { path: PathBuf, message: String },

    /// The scan root is missing, unreadable, or not a directory
    #[error("Traversal error at {path}: {message}")]
    Traversal { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EnvDoctorError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a declaration file error.
    pub fn declaration(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Declaration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a traversal error.
    pub fn traversal(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Traversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the scan can continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Parse { .. } | Self::Declaration { .. } | Self::Config { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Declaration { path, .. } => Some(path),
            Self::Traversal { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for envdoctor results.
pub type EnvDoctorResult<T> = Result<T, EnvDoctorError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> EnvDoctorResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EnvDoctorResult<T> {
        self.map_err(|e| EnvDoctorError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = EnvDoctorError::io(
            PathBuf::from("/project/.env"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, EnvDoctorError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/project/.env")));
        assert!(err.to_string().contains("/project/.env"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = EnvDoctorError::parse_at("/src/index.ts", "unexpected token", 3, 7);
        if let EnvDoctorError::Parse { line, column, .. } = &err {
            assert_eq!(*line, Some(3));
            assert_eq!(*column, Some(7));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_is_recoverable() {
        assert!(EnvDoctorError::parse("/a.js", "error").is_recoverable());
        assert!(EnvDoctorError::declaration("/.env", "gone").is_recoverable());
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(EnvDoctorError::io("/src/a.js", denied).is_recoverable());
        assert!(!EnvDoctorError::traversal("/missing", "not found").is_recoverable());
        assert!(!EnvDoctorError::internal("grammar").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = result.with_path("/missing/.env").unwrap_err();
        assert_eq!(err.path(), Some(&PathBuf::from("/missing/.env")));
    }
}
