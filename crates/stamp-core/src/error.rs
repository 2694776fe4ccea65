//! Error types for metadata queries.
//!
//! A stat can fail for many reasons but callers mostly care about one
//! question: is the entry gone, or is something else wrong? `StatError`
//! answers that through [`StatError::kind`] and keeps the underlying
//! platform error around for diagnostics.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenience type for metadata queries.
pub type Result<T> = std::result::Result<T, StatError>;

/// Coarse classification of a failed stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatErrorKind {
    /// The entry does not exist.
    NotFound,
    /// The entry exists but we aren't allowed to look at it.
    PermissionDenied,
    /// Anything else the platform reported.
    Other,
}

/// Things that can go wrong when querying metadata for a path.
#[derive(Error, Debug)]
pub enum StatError {
    /// The platform refused or failed the stat call.
    #[error("can't stat '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The stat succeeded but the platform has no modification time for
    /// this entry.
    #[error("no modification time available for '{0}'")]
    NoModificationTime(PathBuf),
}

impl StatError {
    /// Creates an IO error with the path for context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path the failed query was about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } => path,
            Self::NoModificationTime(path) => path,
        }
    }

    pub fn kind(&self) -> StatErrorKind {
        match self {
            Self::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => StatErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => StatErrorKind::PermissionDenied,
                _ => StatErrorKind::Other,
            },
            Self::NoModificationTime(_) => StatErrorKind::Other,
        }
    }

    /// Human-readable description of the failure, without the path.
    ///
    /// For OS errors this is the platform's own message (for example
    /// `No such file or directory`), with the `(os error N)` suffix that
    /// `std` appends stripped off.
    pub fn description(&self) -> String {
        match self {
            Self::Io { source, .. } => describe_io(source),
            Self::NoModificationTime(_) => "modification time not supported".to_string(),
        }
    }
}

fn describe_io(err: &io::Error) -> String {
    let text = err.to_string();
    match err.raw_os_error() {
        Some(code) => {
            let suffix = format!(" (os error {})", code);
            text.strip_suffix(suffix.as_str())
                .map(str::to_string)
                .unwrap_or(text)
        }
        None => text,
    }
}
