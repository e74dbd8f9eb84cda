/// Errors from sealing and opening envelopes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Authentication failed: wrong password or tampered data.
    #[error("invalid password or corrupted data")]
    CredentialInvalid,

    #[error("data is not a sealed envelope")]
    NotSealed,

    #[error("truncated envelope: {len} bytes (need at least {min})")]
    Truncated { len: usize, min: usize },

    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    #[error("encryption failed")]
    Encryption,
}

pub type CryptoResult<T> = Result<T, CryptoError>;
