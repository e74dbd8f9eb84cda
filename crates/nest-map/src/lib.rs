//! Nested map engine for Nest.
//!
//! A [`NestedMap`] is a recursive tree whose nodes are either leaves holding a
//! [`Value`] or containers of named children. Nodes are addressed by
//! [`KeyPath`]s and mutated through the functions in [`ops`], which keep the
//! tree free of empty containers below the root.
//!
//! # Key Types
//!
//! - [`NestedMap`] - Leaf/container tree
//! - [`Value`] - Text or binary leaf payload
//! - [`KeyPath`] - Dotted path from the root to a node
//! - [`WriteMode`] - Create-vs-update semantics for [`ops::set`]
//! - [`MapError`] - Failures of path operations

pub mod error;
pub mod node;
pub mod ops;
pub mod path;
pub mod value;

pub use error::{MapError, MapResult};
pub use node::{Children, NestedMap, NodeKind};
pub use ops::WriteMode;
pub use path::KeyPath;
pub use value::Value;
