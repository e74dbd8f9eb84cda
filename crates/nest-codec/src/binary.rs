//! Binary tree frame.
//!
//! On-disk format:
//! ```text
//! [4 bytes: magic "NSTB"]
//! [1 byte:  format version]
//! [4 bytes: CRC32 of the compressed payload (little-endian u32)]
//! [N bytes: zstd-compressed, bincode-serialized tree]
//! ```

use nest_map::NestedMap;
use tracing::debug;

use crate::error::{CodecError, CodecResult};

/// Leading bytes of every binary frame.
pub const MAGIC: &[u8; 4] = b"NSTB";

/// Current frame version.
pub const VERSION: u8 = 1;

/// Magic + version + checksum.
pub const HEADER_SIZE: usize = MAGIC.len() + 1 + 4;

const COMPRESSION_LEVEL: i32 = 3;

/// Returns `true` if `bytes` start with the binary frame magic.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

/// Serialize `tree` into a binary frame.
pub fn encode(tree: &NestedMap) -> CodecResult<Vec<u8>> {
    let payload =
        bincode::serialize(tree).map_err(|e| CodecError::Serialization(e.to_string()))?;
    let compressed = zstd::encode_all(payload.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| CodecError::Compression(e.to_string()))?;
    let crc = crc32fast::hash(&compressed);

    let mut buf = Vec::with_capacity(HEADER_SIZE + compressed.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&crc.to_le_bytes());
    buf.extend_from_slice(&compressed);
    debug!(raw = payload.len(), framed = buf.len(), "binary frame encoded");
    Ok(buf)
}

/// Parse a binary frame back into a tree.
pub fn decode(bytes: &[u8]) -> CodecResult<NestedMap> {
    if bytes.len() < HEADER_SIZE {
        return Err(CodecError::Truncated {
            len: bytes.len(),
            min: HEADER_SIZE,
        });
    }
    if !is_binary(bytes) {
        return Err(CodecError::InvalidMagic);
    }
    let version = bytes[MAGIC.len()];
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let mut crc = [0u8; 4];
    crc.copy_from_slice(&bytes[MAGIC.len() + 1..HEADER_SIZE]);
    let expected = u32::from_le_bytes(crc);

    let payload = &bytes[HEADER_SIZE..];
    let computed = crc32fast::hash(payload);
    if computed != expected {
        return Err(CodecError::ChecksumMismatch { expected, computed });
    }
    let raw = zstd::decode_all(payload).map_err(|e| CodecError::Compression(e.to_string()))?;
    bincode::deserialize(&raw).map_err(|e| CodecError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_map::tree;

    fn sample() -> NestedMap {
        tree!({
            "binary": (vec![245u8, 107, 95, 100]),
            "nested": { "foo": "bar" },
        })
    }

    #[test]
    fn frame_header_layout() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(&bytes[..4], b"NSTB");
        assert_eq!(bytes[4], VERSION);
        let crc = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);
        assert_eq!(crc, crc32fast::hash(&bytes[HEADER_SIZE..]));
    }

    #[test]
    fn roundtrip_preserves_leaf_kinds() {
        let tree = sample();
        assert_eq!(decode(&encode(&tree).unwrap()).unwrap(), tree);
    }

    #[test]
    fn corrupted_payload_detected() {
        let mut bytes = encode(&sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(decode(&bytes), Err(CodecError::ChecksumMismatch { .. })));
    }

    #[test]
    fn truncated_frame_rejected() {
        assert!(matches!(
            decode(b"NSTB\x01"),
            Err(CodecError::Truncated { len: 5, min: HEADER_SIZE })
        ));
    }

    #[test]
    fn wrong_magic_rejected() {
        assert!(matches!(decode(b"XXXX\x01\0\0\0\0abc"), Err(CodecError::InvalidMagic)));
    }

    #[test]
    fn future_version_rejected() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[4] = 9;
        assert!(matches!(decode(&bytes), Err(CodecError::UnsupportedVersion(9))));
    }
}
