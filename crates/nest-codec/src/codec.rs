use nest_map::NestedMap;

use crate::binary;
use crate::error::CodecResult;
use crate::format::Format;
use crate::json;

/// Encoder/decoder for whole trees.
pub struct Codec;

impl Codec {
    /// Serialize `tree` in `format`.
    pub fn encode(tree: &NestedMap, format: Format) -> CodecResult<Vec<u8>> {
        match format {
            Format::Binary => binary::encode(tree),
            Format::Json => json::encode(tree, false),
            Format::PrettyJson => json::encode(tree, true),
        }
    }

    /// Deserialize `bytes`, detecting the format from their content.
    pub fn decode(bytes: &[u8]) -> CodecResult<NestedMap> {
        Self::decode_as(bytes, Self::detect(bytes))
    }

    /// Deserialize `bytes` as `format`. Both JSON variants share a parser.
    pub fn decode_as(bytes: &[u8], format: Format) -> CodecResult<NestedMap> {
        match format {
            Format::Binary => binary::decode(bytes),
            Format::Json | Format::PrettyJson => json::decode(bytes),
        }
    }

    /// Guess the format of `bytes`: binary frames carry a magic prefix,
    /// everything else is treated as JSON.
    pub fn detect(bytes: &[u8]) -> Format {
        if binary::is_binary(bytes) {
            Format::Binary
        } else {
            Format::Json
        }
    }
}
