//! Metadata queries.
//!
//! The watcher never touches the filesystem directly. It asks a
//! [`MetadataProvider`] for the current modification time of a path,
//! which keeps the state machine testable against an in-memory provider.

use crate::error::{Result, StatError};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::trace;

/// The subset of file metadata the watcher cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Last modification time as reported by the filesystem.
    pub modified: SystemTime,

    /// Size of the entry in bytes.
    pub len: u64,
}

impl Metadata {
    pub fn new(modified: SystemTime, len: u64) -> Self {
        Self { modified, len }
    }

    /// True if the entry currently has no content.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Something that can stat a path.
///
/// Implementations must accept arbitrary Unicode paths.
pub trait MetadataProvider {
    /// Returns the current metadata for `path`, or why it couldn't be read.
    fn stat(&self, path: &Path) -> Result<Metadata>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn stat(&self, path: &Path) -> Result<Metadata> {
        (**self).stat(path)
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn stat(&self, path: &Path) -> Result<Metadata> {
        (**self).stat(path)
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Arc<P> {
    fn stat(&self, path: &Path) -> Result<Metadata> {
        (**self).stat(path)
    }
}

/// Queries the real filesystem through `std::fs::metadata`.
///
/// Symlinks are followed, so a watched link reports its target's mtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMetadata;

impl MetadataProvider for FsMetadata {
    fn stat(&self, path: &Path) -> Result<Metadata> {
        let meta = fs::metadata(path).map_err(|e| StatError::io(path, e))?;
        let modified = meta
            .modified()
            .map_err(|_| StatError::NoModificationTime(path.to_path_buf()))?;

        trace!("stat {}: {:?}", path.display(), modified);

        Ok(Metadata::new(modified, meta.len()))
    }
}
