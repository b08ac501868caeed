//! Error types for extraction, generation and output.
//!
//! Failures are attributed to the file, interface or method they belong to
//! and collected into a [`RunReport`] so that one bad interface never stops
//! the rest of a run.

pub mod collection;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use collection::{Failure, FailureKind, GeneratedMock, RunReport};

/// A type expression or method the generator cannot turn into valid source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Elided type at the start of a parameter or result list.
    #[error("elided type has no preceding type in its list")]
    DanglingElision,

    /// Elided type somewhere other than a parameter or result list entry.
    #[error("elided type outside of a parameter or result list")]
    ElisionOutsideGroup,

    #[error("type name is empty")]
    EmptyIdentifier,

    #[error("array length is empty")]
    EmptyArrayLength,

    #[error("variadic parameter '{parameter}' is not the last parameter")]
    MisplacedVariadic { parameter: String },

    #[error("parameter name '{name}' collides with a name used by the generated code")]
    ReservedName { name: String },

    #[error("parameter name '{name}' is declared more than once")]
    DuplicateParameter { name: String },

    #[error("qualifier '{qualifier}' does not match any import of the declaring file")]
    UnknownQualifier { qualifier: String },

    #[error("embedded interface '{name}' is not declared in the same file")]
    UnresolvedEmbed { name: String },
}

/// A [`GenerationError`] attributed to the interface (and method) it
/// occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub interface: String,
    pub path: PathBuf,
    pub method: Option<String>,
    pub error: GenerationError,
}

impl GenerationFailure {
    pub fn new(interface: impl Into<String>, path: impl Into<PathBuf>, error: GenerationError) -> Self {
        Self {
            interface: interface.into(),
            path: path.into(),
            method: None,
            error,
        }
    }

    pub fn in_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to generate mock for '{}' ({})",
            self.interface,
            self.path.display()
        )?;
        if let Some(method) = &self.method {
            write!(f, ", method '{}'", method)?;
        }
        write!(f, ": {}", self.error)
    }
}

impl std::error::Error for GenerationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A source file the extractor could not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{line}:{column}: {message}", .path.display())]
pub struct ExtractError {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ExtractError {
    pub fn new(path: impl Into<PathBuf>, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Top-level error type of the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to parse source: {0}")]
    Extraction(#[from] ExtractError),

    #[error("unable to find {name} in any go files under this path")]
    Lookup { name: String },

    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error("unable to write {destination}: {message}")]
    Sink { destination: String, message: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn sink(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            destination: destination.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_names_method() {
        let failure = GenerationFailure::new(
            "Requester",
            "fixtures/requester.go",
            GenerationError::UnknownQualifier {
                qualifier: "http".into(),
            },
        )
        .in_method("Get");

        let message = failure.to_string();
        assert!(message.contains("'Requester'"));
        assert!(message.contains("method 'Get'"));
        assert!(message.contains("qualifier 'http'"));
    }

    #[test]
    fn test_generation_failure_without_method() {
        let failure = GenerationFailure::new(
            "Reader",
            "a.go",
            GenerationError::UnresolvedEmbed {
                name: "io.Reader".into(),
            },
        );
        assert_eq!(
            failure.to_string(),
            "unable to generate mock for 'Reader' (a.go): embedded interface 'io.Reader' is not declared in the same file"
        );
    }

    #[test]
    fn test_extract_error_position() {
        let err = ExtractError::new("a.go", 3, 7, "expected type");
        assert_eq!(err.to_string(), "a.go:3:7: expected type");
    }

    #[test]
    fn test_lookup_message() {
        let err = Error::Lookup {
            name: "Missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "unable to find Missing in any go files under this path"
        );
    }
}
