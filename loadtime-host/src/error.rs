//! Structured error types for unit resolution and execution
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Errors are `Clone` because a single failure is both stored by observers
//! and propagated to whoever triggered the load.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("No unit named '{name}'")]
    NotFound { name: String },

    /// A failure raised by the unit's own code while executing.
    #[error("{message}")]
    Raised { kind: String, message: String },

    #[error("{unit}:{line}: {message}")]
    Syntax {
        unit: String,
        line: usize,
        message: String,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error(transparent)]
    Finder(#[from] FinderError),
}

impl LoadError {
    /// Shorthand for a failure raised by unit code, e.g. `ValueError: boom`.
    pub fn raised(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Raised {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Short type label shown next to the message in reports.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::NotFound { .. } => "NotFoundError",
            Self::Raised { kind, .. } => kind,
            Self::Syntax { .. } => "SyntaxError",
            Self::Io { .. } => "IoError",
            Self::Finder(_) => "FinderError",
        }
    }
}

/// Errors reported by a [`Finder`](crate::Finder) while answering a lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// The finder cannot answer this kind of query. Callers skip it.
    #[error("{finder} does not support this lookup")]
    Unsupported { finder: String },

    #[error("{finder} failed: {message}")]
    Failed { finder: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raised_display_is_message_only() {
        let err = LoadError::raised("ValueError", "boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.type_name(), "ValueError");
    }

    #[test]
    fn test_not_found_display() {
        let err = LoadError::not_found("requests");
        assert_eq!(err.to_string(), "No unit named 'requests'");
        assert_eq!(err.type_name(), "NotFoundError");
    }

    #[test]
    fn test_syntax_error_carries_location() {
        let err = LoadError::Syntax {
            unit: "app".to_string(),
            line: 3,
            message: "unknown directive 'lod'".to_string(),
        };
        assert_eq!(err.to_string(), "app:3: unknown directive 'lod'");
        assert_eq!(err.type_name(), "SyntaxError");
    }

    #[test]
    fn test_io_error_is_cloneable() {
        let err = LoadError::io(
            "/tmp/missing.unit",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let copy = err.clone();
        assert!(copy.to_string().contains("/tmp/missing.unit"));
        assert_eq!(copy.type_name(), "IoError");
    }

    #[test]
    fn test_finder_error_converts() {
        let err: LoadError = FinderError::Failed {
            finder: "ScriptFinder".to_string(),
            message: "bad root".to_string(),
        }
        .into();
        assert_eq!(err.type_name(), "FinderError");
        assert!(err.to_string().contains("bad root"));
    }
}
