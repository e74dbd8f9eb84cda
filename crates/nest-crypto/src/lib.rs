//! Password encryption for Nest sources.
//!
//! Sealed data is self-describing: [`Envelope::is_sealed`] recognizes it by
//! its magic prefix, and every envelope carries its own salt and nonce.
//! Only established primitives are used (BLAKE3 key derivation, AES-256-GCM).

pub mod credential;
pub mod envelope;
pub mod error;

pub use credential::Credential;
pub use envelope::Envelope;
pub use error::{CryptoError, CryptoResult};
