use std::path::Path;

use nest_codec::{Codec, Format};
use nest_map::{NestedMap, Value};
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

/// How a leaf's value is stored inside its file in a directory source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeafEncoding {
    /// File contents are the raw value bytes. UTF-8 reads back as text.
    #[default]
    Raw,
    /// File contents are a codec document holding a single leaf, which
    /// preserves the text/binary distinction exactly.
    Codec(Format),
}

/// Mapping between tree nodes and directory entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryLayout {
    /// Extension appended to leaf file names. When set, files without it are
    /// ignored on load.
    pub leaf_extension: Option<String>,
    pub leaf_encoding: LeafEncoding,
}

impl DirectoryLayout {
    /// File name used for the leaf stored under `key`.
    pub fn leaf_file_name(&self, key: &str) -> String {
        match &self.leaf_extension {
            Some(ext) => format!("{key}.{ext}"),
            None => key.to_string(),
        }
    }

    /// Key of the leaf stored in `file_name`, or `None` if the file does
    /// not carry the configured extension.
    pub fn leaf_key<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        match &self.leaf_extension {
            Some(ext) => file_name
                .strip_suffix(ext.as_str())
                .and_then(|stem| stem.strip_suffix('.'))
                .filter(|key| !key.is_empty()),
            None => Some(file_name),
        }
    }

    pub(crate) fn encode_leaf(&self, value: &Value) -> SourceResult<Vec<u8>> {
        match self.leaf_encoding {
            LeafEncoding::Raw => Ok(value.as_bytes().to_vec()),
            LeafEncoding::Codec(format) => {
                Ok(Codec::encode(&NestedMap::Leaf(value.clone()), format)?)
            }
        }
    }

    pub(crate) fn decode_leaf(&self, bytes: Vec<u8>, path: &Path) -> SourceResult<Value> {
        match self.leaf_encoding {
            LeafEncoding::Raw => Ok(Value::from_bytes(bytes)),
            LeafEncoding::Codec(format) => match Codec::decode_as(&bytes, format)? {
                NestedMap::Leaf(value) => Ok(value),
                NestedMap::Container(_) => Err(SourceError::InvalidLeaf(path.to_path_buf())),
            },
        }
    }
}

/// Settings shared by every source a process opens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Format used when writing file sources. Reading detects the format.
    pub file_format: Format,
    pub layout: DirectoryLayout,
}
