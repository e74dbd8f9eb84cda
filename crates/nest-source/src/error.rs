use std::path::PathBuf;

use nest_codec::CodecError;
use nest_crypto::CryptoError;
use nest_map::MapError;

/// Errors from loading and saving sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The location could not be read or written.
    #[error("source unavailable: {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Sealed data was found but no password was supplied.
    #[error("a password is required to open {}", .0.display())]
    CredentialRequired(PathBuf),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("map error: {0}")]
    Map(#[from] MapError),

    /// A key cannot be represented as a file name.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Two filesystem entries map to the same key.
    #[error("duplicate key {key:?} in {}", .dir.display())]
    DuplicateKey { key: String, dir: PathBuf },

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Only containers can be mirrored as directories.
    #[error("the root of a directory source must be a container")]
    RootNotContainer,

    /// A leaf file held a document that is not a single value.
    #[error("leaf file {} does not hold a single value", .0.display())]
    InvalidLeaf(PathBuf),

    #[error("invalid source location: {0:?}")]
    InvalidLocation(String),
}

impl SourceError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unavailable {
            path: path.into(),
            source,
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
