//! Per-theme error types.
//!
//! Everything in this module describes a failure that is scoped to a single
//! theme file. The pipeline catches these at the per-theme boundary, records
//! them in the run summary and keeps going. Failures that make the whole run
//! meaningless (missing source root, unwritable destination) are reported
//! through `anyhow` instead and never become a `ThemeError`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised while processing one theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The source is not well-formed structured data (or has the wrong shape).
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A field the converter cannot do without is absent or empty.
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    /// Two distinct source themes derive the same output file name.
    #[error("output name `{file_name}` is produced by {}", join_paths(.sources))]
    NameCollision {
        file_name: String,
        sources: Vec<PathBuf>,
    },

    /// No companion descriptor exists next to the theme.
    #[error("no sidecar descriptor at {}", .0.display())]
    SidecarMissing(PathBuf),

    /// Reading or writing a file belonging to this theme failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ThemeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly name of the error kind, used in summaries.
    pub fn kind(&self) -> ThemeErrorKind {
        match self {
            Self::MalformedDocument(_) => ThemeErrorKind::MalformedDocument,
            Self::MissingRequiredField(_) => ThemeErrorKind::MissingRequiredField,
            Self::NameCollision { .. } => ThemeErrorKind::NameCollision,
            Self::SidecarMissing(_) => ThemeErrorKind::SidecarMissing,
            Self::Io { .. } => ThemeErrorKind::Io,
        }
    }
}

/// The kind of a [`ThemeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeErrorKind {
    MalformedDocument,
    MissingRequiredField,
    NameCollision,
    SidecarMissing,
    Io,
}

impl fmt::Display for ThemeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedDocument => "MalformedDocument",
            Self::MissingRequiredField => "MissingRequiredField",
            Self::NameCollision => "NameCollision",
            Self::SidecarMissing => "SidecarMissing",
            Self::Io => "Io",
        };
        f.write_str(name)
    }
}

/// A per-theme error paired with the file it came from.
#[derive(Debug)]
pub struct ThemeFailure {
    pub source: PathBuf,
    pub error: ThemeError,
}

impl ThemeFailure {
    pub fn new(source: impl Into<PathBuf>, error: ThemeError) -> Self {
        Self {
            source: source.into(),
            error,
        }
    }
}

impl fmt::Display for ThemeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.error)
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
