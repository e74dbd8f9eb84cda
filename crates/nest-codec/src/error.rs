use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown format: {0} (expected binary, json or pretty)")]
    UnknownFormat(String),

    #[error("truncated binary frame: {len} bytes (need at least {min})")]
    Truncated { len: usize, min: usize },

    #[error("invalid magic bytes")]
    InvalidMagic,

    #[error("unsupported binary format version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { expected: u32, computed: u32 },

    #[error("compression error: {0}")]
    Compression(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
