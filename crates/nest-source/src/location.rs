use std::path::{Path, PathBuf};
use std::str::FromStr;

use nest_crypto::Credential;

use crate::error::SourceError;

/// Where a tree is stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// A single file holding the whole encoded tree.
    File(PathBuf),
    /// A directory hierarchy mirroring the tree: containers are
    /// subdirectories and leaves are files.
    Directory(PathBuf),
}

impl Location {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Directory(path) => write!(f, "dir:{}", path.display()),
        }
    }
}

/// Parses `file:PATH`, `dir:PATH`, or a bare path. A bare path is a
/// directory if it ends with `/` or names an existing directory.
impl FromStr for Location {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let non_empty = |rest: &str| {
            if rest.is_empty() {
                Err(SourceError::InvalidLocation(s.to_string()))
            } else {
                Ok(PathBuf::from(rest))
            }
        };
        if let Some(rest) = text.strip_prefix("dir:") {
            return non_empty(rest).map(Self::Directory);
        }
        if let Some(rest) = text.strip_prefix("file:") {
            return non_empty(rest).map(Self::File);
        }
        let path = non_empty(text)?;
        if text.ends_with('/') || path.is_dir() {
            Ok(Self::Directory(path))
        } else {
            Ok(Self::File(path))
        }
    }
}

/// A location plus the password used to seal or open it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub location: Location,
    pub credential: Option<Credential>,
}

impl Source {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            credential: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Location::File(path.into()))
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(Location::Directory(path.into()))
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn is_encrypted(&self) -> bool {
        self.credential.is_some()
    }
}
