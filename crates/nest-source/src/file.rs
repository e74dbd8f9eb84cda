use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use nest_codec::{Codec, Format};
use nest_crypto::{Credential, Envelope};
use nest_map::NestedMap;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::traits::TreeStore;

/// A tree stored as one encoded, optionally sealed, file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    format: Format,
}

impl FileStore {
    /// `format` applies to writes; reads detect the format from the content.
    pub fn new(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TreeStore for FileStore {
    fn load(&self, credential: Option<&Credential>) -> SourceResult<NestedMap> {
        let bytes = fs::read(&self.path).map_err(|e| SourceError::unavailable(&self.path, e))?;
        debug!(path = %self.path.display(), len = bytes.len(), "file source read");
        let plain = unseal(bytes, credential, &self.path)?;
        Ok(Codec::decode(&plain)?)
    }

    fn save(&self, tree: &NestedMap, credential: Option<&Credential>) -> SourceResult<()> {
        let encoded = Codec::encode(tree, self.format)?;
        let data = seal(encoded, credential)?;
        write_atomic(&self.path, &data, credential.is_some())?;
        debug!(
            path = %self.path.display(),
            format = %self.format,
            sealed = credential.is_some(),
            len = data.len(),
            "file source written"
        );
        Ok(())
    }
}

/// Open `bytes` if they are sealed. Plain bytes pass through unchanged.
///
/// A plain file is a whole codec document, which starts with the binary
/// frame magic or with JSON text, never with the envelope magic.
fn unseal(
    bytes: Vec<u8>,
    credential: Option<&Credential>,
    path: &Path,
) -> SourceResult<Vec<u8>> {
    if !Envelope::is_sealed(&bytes) {
        return Ok(bytes);
    }
    let credential = credential.ok_or_else(|| SourceError::CredentialRequired(path.to_path_buf()))?;
    Ok(Envelope::open(credential, &bytes)?)
}

/// Seal `bytes` when a credential is given.
pub(crate) fn seal(bytes: Vec<u8>, credential: Option<&Credential>) -> SourceResult<Vec<u8>> {
    match credential {
        Some(credential) => Ok(Envelope::seal(credential, &bytes)?),
        None => Ok(bytes),
    }
}

/// Write `data` to `path` through a temporary file in the same directory,
/// so readers see either the old or the new content. Private files are
/// readable by the owner only.
pub(crate) fn write_atomic(path: &Path, data: &[u8], private: bool) -> SourceResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| SourceError::unavailable(parent, e))?;

    let mut temp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| SourceError::unavailable(parent, e))?;
    set_mode(temp.as_file(), private).map_err(|e| SourceError::unavailable(path, e))?;
    temp.write_all(data)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| SourceError::unavailable(path, e))?;
    temp.persist(path)
        .map_err(|e| SourceError::unavailable(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(file: &fs::File, private: bool) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = if private { 0o600 } else { 0o644 };
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _private: bool) -> std::io::Result<()> {
    Ok(())
}
