//! Stamp Core - metadata and diagnostic contracts
//!
//! This crate defines the two capabilities a Stamp watcher consumes:
//! a [`MetadataProvider`] that can stat a path, and a [`DiagnosticSink`]
//! that receives the one-off report when a watch can't start.
//!
//! # Example
//!
//! ```no_run
//! use stamp_core::{FsMetadata, MetadataProvider};
//! use std::path::Path;
//!
//! let meta = FsMetadata.stat(Path::new("assets/shader.glsl")).unwrap();
//! println!("modified at {:?} ({} bytes)", meta.modified, meta.len);
//! ```

pub mod diagnostic;
pub mod error;
pub mod metadata;

pub use diagnostic::{DiagnosticSink, TracingSink};
pub use error::{Result, StatError, StatErrorKind};
pub use metadata::{FsMetadata, Metadata, MetadataProvider};
