use std::fs;
use std::path::Path;

use anyhow::Context;
use nest_codec::Format;
use nest_source::SourceConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Settings for a `nest` invocation.
///
/// Layered with the highest priority first: command-line flags, then the
/// TOML file named by `--config` or `NEST_CONFIG`, then these defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Encoding for data written to stdout.
    pub format: Format,
    /// Settings for file and directory sources.
    pub source: SourceConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: Format::PrettyJson,
            source: SourceConfig::default(),
        }
    }
}

impl CliConfig {
    /// Read a TOML configuration file. Missing keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Merge the config file, if any, with the flags given on the command line.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(format) = cli.format {
            config.format = format;
        }
        if let Some(ext) = &cli.leaf_ext {
            config.source.layout.leaf_extension = Some(ext.clone());
        }
        Ok(config)
    }
}
