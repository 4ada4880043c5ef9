//! Error types for vecgen.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for batch-level operations.
pub type Result<T> = std::result::Result<T, VecgenError>;

/// Top-level error type.
///
/// Every variant except `InvalidInput` and `Config` describes a failure that is
/// scoped to a single input file; the batch orchestrator records those and keeps
/// going.
#[derive(Debug, Error)]
pub enum VecgenError {
    #[error("unsupported input format '{extension}' for {}", .path.display())]
    InputFormat { path: PathBuf, extension: String },

    #[error("malformed vector drawable {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("unresolved reference in {}: {source}", .path.display())]
    UnresolvedReference {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },

    #[error("filesystem error on {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to normalize {}: {message}", .path.display())]
    Normalize { path: PathBuf, message: String },

    #[error("failed to generate source for {}: {message}", .path.display())]
    Emit { path: PathBuf, message: String },

    #[error("invalid input {}: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`VecgenError`], matching the four per-file
/// failure classes a caller shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputFormat,
    MalformedVector,
    UnresolvedReference,
    Filesystem,
    /// Failure of the batch's own top-level input or configuration.
    Fatal,
}

impl VecgenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputFormat { .. } => ErrorKind::InputFormat,
            Self::Malformed { .. } | Self::Normalize { .. } | Self::Emit { .. } => {
                ErrorKind::MalformedVector
            }
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::InvalidInput { .. } | Self::Config(_) => ErrorKind::Fatal,
        }
    }

    /// The file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InputFormat { path, .. }
            | Self::Malformed { path, .. }
            | Self::UnresolvedReference { path, .. }
            | Self::Filesystem { path, .. }
            | Self::Normalize { path, .. }
            | Self::Emit { path, .. }
            | Self::InvalidInput { path, .. } => Some(path),
            Self::Config(_) => None,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Attach a file path to a drawable parse failure.
    pub fn from_drawable(path: impl Into<PathBuf>, error: DrawableError) -> Self {
        let path = path.into();
        match error {
            DrawableError::Parse(source) => Self::Malformed { path, source },
            DrawableError::Resolve(source) => Self::UnresolvedReference { path, source },
        }
    }
}

/// Errors produced while turning one drawable document into a `Vector`.
#[derive(Debug, Error)]
pub enum DrawableError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// The document is not a well-formed vector drawable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("invalid number '{value}' for attribute '{attribute}'")]
    InvalidNumber { attribute: String, value: String },

    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue { attribute: String, value: String },

    #[error("invalid color '{value}'")]
    InvalidColor { value: String },

    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("unknown path command '{command}' at offset {offset}")]
    UnknownCommand { command: char, offset: usize },

    #[error("path command '{command}' at offset {offset} is missing operands")]
    MissingOperands { command: char, offset: usize },

    #[error("unexpected path data '{found}' at offset {offset}")]
    UnexpectedPathData { found: String, offset: usize },

    #[error("invalid gradient: {0}")]
    InvalidGradient(String),

    #[error("unsupported feature: {0}")]
    Unsupported(String),
}

/// A resource or attribute reference that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("undefined color resource '{reference}'")]
    UndefinedColor { reference: String },

    #[error("theme attribute '{reference}' cannot be resolved outside an app")]
    ThemeAttribute { reference: String },

    #[error("unsupported resource reference '{reference}'")]
    UnsupportedReference { reference: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = VecgenError::from_drawable(
            "a.xml",
            DrawableError::Parse(ParseError::InvalidColor {
                value: "#12".into(),
            }),
        );
        assert_eq!(err.kind(), ErrorKind::MalformedVector);
        assert_eq!(err.path(), Some(Path::new("a.xml")));

        let err = VecgenError::from_drawable(
            "b.xml",
            DrawableError::Resolve(ResolveError::UndefinedColor {
                reference: "@color/red".into(),
            }),
        );
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);

        assert_eq!(VecgenError::Config("bad".into()).kind(), ErrorKind::Fatal);
        assert!(VecgenError::Config("bad".into()).path().is_none());
    }

    #[test]
    fn test_display_includes_path() {
        let err = VecgenError::io(
            "out/Add.kt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out/Add.kt"));
        assert!(msg.contains("denied"));
    }
}
