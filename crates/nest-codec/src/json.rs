//! JSON mapping for trees.
//!
//! Containers map to objects, text leaves to strings and binary leaves to
//! arrays of byte-sized integers. Any other JSON value is rejected.

use nest_map::{Children, NestedMap, Value};
use serde_json::Value as Json;

use crate::error::{CodecError, CodecResult};

/// Convert a tree into a JSON value.
pub fn to_json(tree: &NestedMap) -> Json {
    match tree {
        NestedMap::Leaf(Value::Text(text)) => Json::String(text.clone()),
        NestedMap::Leaf(Value::Binary(bytes)) => {
            Json::Array(bytes.iter().map(|b| Json::from(*b)).collect())
        }
        NestedMap::Container(children) => Json::Object(
            children
                .iter()
                .map(|(key, child)| (key.clone(), to_json(child)))
                .collect(),
        ),
    }
}

/// Convert a JSON value into a tree.
pub fn from_json(json: Json) -> CodecResult<NestedMap> {
    match json {
        Json::Object(map) => map
            .into_iter()
            .map(|(key, child)| Ok((key, from_json(child)?)))
            .collect::<CodecResult<Children>>()
            .map(NestedMap::Container),
        Json::String(text) => Ok(NestedMap::leaf(text)),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| {
                        CodecError::Malformed(format!("binary leaf holds a non-byte item: {item}"))
                    })
            })
            .collect::<CodecResult<Vec<u8>>>()
            .map(NestedMap::leaf),
        other => Err(CodecError::Malformed(format!(
            "unsupported JSON value: {other}"
        ))),
    }
}

/// Serialize a tree as JSON text terminated by a newline.
pub fn encode(tree: &NestedMap, pretty: bool) -> CodecResult<Vec<u8>> {
    let json = to_json(tree);
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(&json)
    } else {
        serde_json::to_vec(&json)
    }
    .map_err(|e| CodecError::Serialization(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse JSON text into a tree. Blank input is an empty root.
pub fn decode(bytes: &[u8]) -> CodecResult<NestedMap> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(NestedMap::new());
    }
    let json: Json =
        serde_json::from_slice(bytes).map_err(|e| CodecError::Deserialization(e.to_string()))?;
    from_json(json)
}

/// Interpret a value typed on the command line.
///
/// JSON objects, strings and byte arrays are taken as structured values;
/// anything else, including malformed JSON, is stored verbatim as text.
pub fn parse_cli_value(text: &str) -> NestedMap {
    match serde_json::from_str::<Json>(text) {
        Ok(json @ (Json::Object(_) | Json::String(_) | Json::Array(_))) => {
            from_json(json).unwrap_or_else(|_| NestedMap::leaf(text))
        }
        _ => NestedMap::leaf(text),
    }
}
