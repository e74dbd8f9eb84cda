//! Serialization formats for Nest trees.
//!
//! Trees travel either as a compact binary frame (magic, version, CRC32 and a
//! zstd-compressed bincode payload) or as JSON. Decoding detects the format
//! from the content, so callers only pick a format when writing.
//!
//! # Key Types
//!
//! - [`Codec`] - Encode and decode whole trees
//! - [`Format`] - Binary, compact JSON or pretty JSON
//! - [`CodecError`] - Framing, checksum and document errors

pub mod binary;
pub mod codec;
pub mod error;
pub mod format;
pub mod json;

pub use codec::Codec;
pub use error::{CodecError, CodecResult};
pub use format::Format;
pub use json::parse_cli_value;
