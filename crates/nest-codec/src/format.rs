use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Serialization format of a whole tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Checksummed, compressed binary frame.
    #[default]
    Binary,
    /// Compact JSON.
    Json,
    /// Indented JSON.
    #[serde(alias = "pretty")]
    PrettyJson,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Json => f.write_str("json"),
            Self::PrettyJson => f.write_str("pretty-json"),
        }
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "bin" => Ok(Self::Binary),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" => Ok(Self::PrettyJson),
            _ => Err(CodecError::UnknownFormat(s.to_string())),
        }
    }
}
