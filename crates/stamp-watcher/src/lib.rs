//! Stamp Watcher - polling modification detection
//!
//! This crate answers one question cheaply: has this file changed since I
//! last looked? It does so by comparing modification times on demand:
//! - No OS notification APIs, no background threads
//! - Deletion ends the watch for good (unless told to ignore errors)
//! - Each timestamp advance is reported exactly once

mod flags;
mod watcher;

pub use flags::WatchFlags;
pub use watcher::{FileWatcher, WatchState, COMPONENT};
