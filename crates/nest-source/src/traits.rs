use nest_crypto::Credential;
use nest_map::NestedMap;

use crate::error::SourceResult;

/// A persistent home for one tree.
///
/// Implementations must satisfy these rules:
/// - `save` followed by `load` with the same credential yields an equal tree,
///   up to leaf kinds the backend cannot represent.
/// - Sealed data is detected on load. Without a credential it fails with
///   `CredentialRequired` and never yields ciphertext as a value.
/// - `save` replaces the previous content entirely.
pub trait TreeStore {
    /// Read the whole tree.
    fn load(&self, credential: Option<&Credential>) -> SourceResult<NestedMap>;

    /// Replace the stored tree with `tree`, sealing it if a credential is given.
    fn save(&self, tree: &NestedMap, credential: Option<&Credential>) -> SourceResult<()>;
}
