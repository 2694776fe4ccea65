//! Behaviour flags for a watcher.

use bitflags::bitflags;

bitflags! {
    /// Tweaks to the default watch policy. The empty set is the strict
    /// policy: any stat failure ends the watch for good.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WatchFlags: u8 {
        /// Never abort the watch on a stat failure and never report one.
        ///
        /// For files that get replaced by deleting and recreating them. A
        /// failure at construction starts the watch from the Unix epoch, so
        /// the file showing up later counts as a change.
        const IGNORE_ERRORS          = 1 << 0;

        /// Don't report a change while the file is empty.
        ///
        /// For writers that truncate first and fill the file later. The new
        /// timestamp is only recorded once there is content.
        const IGNORE_CHANGE_IF_EMPTY = 1 << 1;
    }
}
