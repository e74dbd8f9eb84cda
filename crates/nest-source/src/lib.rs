//! Storage backends for Nest trees.
//!
//! A [`Source`] names where a tree lives and, optionally, the password that
//! seals it. [`SourceAdapter`] dispatches to a [`TreeStore`] backend:
//!
//! - [`FileStore`] - the whole tree encoded in one file, written atomically
//! - [`DirectoryStore`] - containers as subdirectories, leaves as files
//!
//! Sealed data is recognized on load whatever backend holds it. Loading
//! does not prune: empty directories come back as empty containers and the
//! caller decides when to restore the pruned shape.

pub mod adapter;
pub mod config;
pub mod directory;
pub mod error;
pub mod file;
pub mod location;
pub mod traits;

pub use adapter::SourceAdapter;
pub use config::{DirectoryLayout, LeafEncoding, SourceConfig};
pub use directory::DirectoryStore;
pub use error::{SourceError, SourceResult};
pub use file::FileStore;
pub use location::{Location, Source};
pub use traits::TreeStore;
