//! Authenticated password envelopes.
//!
//! Format:
//! ```text
//! [4 bytes:  magic "NSTE"]
//! [1 byte:   envelope version]
//! [16 bytes: random salt]
//! [12 bytes: random nonce]
//! [N bytes:  AES-256-GCM ciphertext with 16-byte tag]
//! ```
//!
//! The key is derived with BLAKE3 in key-derivation mode from the salt and
//! the password, so equal plaintexts seal to different bytes every time.
//! BLAKE3 is fast and has no work factor, so this is not a password-hardening
//! KDF: a stolen envelope can be guessed against offline at hash speed. Use
//! a high-entropy password.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

use crate::credential::Credential;
use crate::error::{CryptoError, CryptoResult};

/// Leading bytes of every sealed envelope.
pub const MAGIC: &[u8; 4] = b"NSTE";

/// Current envelope version.
pub const VERSION: u8 = 1;

pub const SALT_SIZE: usize = 16;
pub const NONCE_SIZE: usize = 12;

/// Magic + version + salt + nonce.
pub const HEADER_SIZE: usize = MAGIC.len() + 1 + SALT_SIZE + NONCE_SIZE;

/// Authentication tag appended by AES-GCM.
const TAG_SIZE: usize = 16;

const KEY_CONTEXT: &str = "nest 2024-06-01 envelope key v1";

/// Seal/open operations over byte buffers.
pub struct Envelope;

impl Envelope {
    /// Returns `true` if `bytes` carry the envelope magic.
    pub fn is_sealed(bytes: &[u8]) -> bool {
        bytes.starts_with(MAGIC)
    }

    /// Encrypt `plaintext` under `credential` with a fresh salt and nonce.
    pub fn seal(credential: &Credential, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut salt = [0u8; SALT_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let ciphertext = cipher(credential, &salt)
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CryptoError::Encryption)?;

        let mut out = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt an envelope produced by [`Envelope::seal`].
    pub fn open(credential: &Credential, bytes: &[u8]) -> CryptoResult<Vec<u8>> {
        if !Self::is_sealed(bytes) {
            return Err(CryptoError::NotSealed);
        }
        if bytes.len() < HEADER_SIZE + TAG_SIZE {
            return Err(CryptoError::Truncated {
                len: bytes.len(),
                min: HEADER_SIZE + TAG_SIZE,
            });
        }
        let version = bytes[MAGIC.len()];
        if version != VERSION {
            return Err(CryptoError::UnsupportedVersion(version));
        }

        let salt_start = MAGIC.len() + 1;
        let nonce_start = salt_start + SALT_SIZE;
        let salt = &bytes[salt_start..nonce_start];
        let nonce = &bytes[nonce_start..HEADER_SIZE];
        cipher(credential, salt)
            .decrypt(Nonce::from_slice(nonce), &bytes[HEADER_SIZE..])
            .map_err(|_| CryptoError::CredentialInvalid)
    }
}

/// Single-pass key derivation. Offers no resistance to brute force beyond
/// the strength of the password itself.
fn cipher(credential: &Credential, salt: &[u8]) -> Aes256Gcm {
    let password = credential.expose().as_bytes();
    let mut material = Vec::with_capacity(salt.len() + password.len());
    material.extend_from_slice(salt);
    material.extend_from_slice(password);
    let key = blake3::derive_key(KEY_CONTEXT, &material);
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key))
}
