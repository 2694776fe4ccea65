//! Polling file watcher.
//!
//! Answers "has this file changed since I last looked?" by comparing
//! modification times. There is no background thread and no OS handle:
//! every call to [`FileWatcher::has_changed`] does one stat, and how often
//! to call it is up to the caller.

use crate::flags::WatchFlags;
use stamp_core::{DiagnosticSink, FsMetadata, MetadataProvider, TracingSink};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Name used as the prefix of diagnostic lines.
pub const COMPONENT: &str = "stamp::FileWatcher";

/// What the watcher currently knows about its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Tracking a real entry last seen modified at `last_modified`.
    Valid { last_modified: SystemTime },

    /// Not tracking anything. Terminal.
    Invalid,
}

impl WatchState {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Watches a single file for modification by polling its mtime.
///
/// Once a watcher becomes invalid (the file couldn't be stat'ed) it stays
/// invalid; construct a new one to start watching again. A file that is
/// deleted and recreated between two checks looks like an ordinary
/// modification, since only the timestamp is tracked.
///
/// # Example
///
/// ```no_run
/// use stamp_watcher::FileWatcher;
///
/// let mut watcher = FileWatcher::new("config.toml");
/// loop {
///     if watcher.has_changed() {
///         println!("reloading");
///     }
///     if !watcher.is_valid() {
///         break;
///     }
///     std::thread::sleep(std::time::Duration::from_millis(250));
/// }
/// ```
#[derive(Debug)]
pub struct FileWatcher<P: MetadataProvider = FsMetadata> {
    path: PathBuf,
    state: WatchState,
    flags: WatchFlags,
    provider: P,
}

impl FileWatcher {
    /// Starts watching `path` on the real filesystem.
    ///
    /// If the file can't be stat'ed the watcher starts out invalid and the
    /// reason is logged through `tracing`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_flags(path, WatchFlags::empty())
    }

    /// Like [`FileWatcher::new`], with non-default behaviour flags.
    pub fn with_flags(path: impl Into<PathBuf>, flags: WatchFlags) -> Self {
        Self::with_provider(path, flags, FsMetadata, &mut TracingSink)
    }
}

impl<P: MetadataProvider> FileWatcher<P> {
    /// Starts watching `path` through `provider`.
    ///
    /// A failed initial stat is reported to `sink` as a single line, unless
    /// [`WatchFlags::IGNORE_ERRORS`] is set. The sink is not kept; nothing
    /// is reported after construction.
    pub fn with_provider(
        path: impl Into<PathBuf>,
        flags: WatchFlags,
        provider: P,
        sink: &mut dyn DiagnosticSink,
    ) -> Self {
        let path = path.into();

        let state = match provider.stat(&path) {
            Ok(meta) if flags.contains(WatchFlags::IGNORE_CHANGE_IF_EMPTY) && meta.is_empty() => {
                debug!("{} is empty, waiting for content", path.display());
                WatchState::Valid {
                    last_modified: SystemTime::UNIX_EPOCH,
                }
            }
            Ok(meta) => WatchState::Valid {
                last_modified: meta.modified,
            },
            Err(e) if flags.contains(WatchFlags::IGNORE_ERRORS) => {
                debug!("Ignoring stat failure for {}: {}", path.display(), e);
                WatchState::Valid {
                    last_modified: SystemTime::UNIX_EPOCH,
                }
            }
            Err(e) => {
                sink.emit(&format!(
                    "{}: can't stat {}: {}, aborting watch",
                    COMPONENT,
                    path.display(),
                    e.description()
                ));
                WatchState::Invalid
            }
        };

        Self {
            path,
            state,
            flags,
            provider,
        }
    }

    /// The watched path, exactly as given at construction.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flags(&self) -> WatchFlags {
        self.flags
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Most recently observed modification time, `None` once invalid.
    pub fn last_modified(&self) -> Option<SystemTime> {
        match self.state {
            WatchState::Valid { last_modified } => Some(last_modified),
            WatchState::Invalid => None,
        }
    }

    /// Whether the watcher is still tracking its file. No I/O.
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// Checks whether the file was modified since the last call.
    ///
    /// Returns `true` at most once per timestamp advance. If the file can no
    /// longer be stat'ed the watcher silently becomes invalid and returns
    /// `false`; an invalid watcher returns `false` without touching the
    /// filesystem.
    pub fn has_changed(&mut self) -> bool {
        let last_modified = match self.state {
            WatchState::Valid { last_modified } => last_modified,
            WatchState::Invalid => return false,
        };

        let meta = match self.provider.stat(&self.path) {
            Ok(meta) => meta,
            Err(e) if self.flags.contains(WatchFlags::IGNORE_ERRORS) => {
                debug!("Ignoring stat failure for {}: {}", self.path.display(), e);
                return false;
            }
            Err(e) => {
                debug!("Stopped watching {}: {}", self.path.display(), e);
                self.state = WatchState::Invalid;
                return false;
            }
        };

        if self.flags.contains(WatchFlags::IGNORE_CHANGE_IF_EMPTY) && meta.is_empty() {
            return false;
        }

        if meta.modified > last_modified {
            debug!("{} modified", self.path.display());
            self.state = WatchState::Valid {
                last_modified: meta.modified,
            };
            true
        } else {
            false
        }
    }
}
