use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nest_crypto::{Credential, CryptoError, Envelope};
use nest_map::{ops, Children, KeyPath, NestedMap};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DirectoryLayout;
use crate::error::{SourceError, SourceResult};
use crate::file::{seal, write_atomic};
use crate::traits::TreeStore;

/// File at the root of a sealed directory. It holds an envelope over
/// [`SEAL_CHECK`], so a wrong password fails before any leaf is read.
pub const SEAL_MARKER: &str = ".nest-sealed";

const SEAL_CHECK: &[u8] = b"nest sealed directory";

/// A tree mirrored onto a directory hierarchy.
///
/// Containers are subdirectories named by their key and leaves are files
/// named by their key plus the optional leaf extension. A directory is either
/// sealed as a whole, marked by [`SEAL_MARKER`] and with every leaf file an
/// envelope, or plain, in which case leaf bytes are taken as they are. The
/// directory is owned by the store: on save, entries that no longer
/// correspond to a key are removed, except files lacking the configured leaf
/// extension.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    layout: DirectoryLayout,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, layout: DirectoryLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Map a path relative to the root onto a key path. Returns `None` for
    /// files that are not leaves under the current layout.
    fn key_path(&self, relative: &Path, is_dir: bool) -> SourceResult<Option<KeyPath>> {
        let mut segments = Vec::new();
        for component in relative.components() {
            let name = component.as_os_str();
            let key = name.to_str().ok_or_else(|| SourceError::InvalidKey {
                key: name.to_string_lossy().into_owned(),
                reason: "file name is not valid UTF-8".into(),
            })?;
            segments.push(key.to_string());
        }
        if !is_dir {
            if let Some(file_name) = segments.pop() {
                match self.layout.leaf_key(&file_name) {
                    Some(key) => segments.push(key.to_string()),
                    None => return Ok(None),
                }
            }
        }
        Ok(Some(KeyPath::new(segments)))
    }

    /// Entries the store neither reads nor removes: the seal marker, and
    /// files without the leaf extension when one is configured.
    fn is_foreign(&self, name: Option<&str>, is_dir: bool) -> bool {
        if name == Some(SEAL_MARKER) {
            return true;
        }
        !is_dir
            && self.layout.leaf_extension.is_some()
            && name.and_then(|name| self.layout.leaf_key(name)).is_none()
    }

    /// Decide the entry name of every child, rejecting keys that cannot be
    /// file names and keys whose entry names collide.
    fn plan<'a>(
        &self,
        children: &'a Children,
        dir: &Path,
    ) -> SourceResult<BTreeMap<String, &'a NestedMap>> {
        let mut entries = BTreeMap::new();
        for (key, child) in children {
            validate_key(key)?;
            let name = match child {
                NestedMap::Leaf(_) => self.layout.leaf_file_name(key),
                NestedMap::Container(_) => key.clone(),
            };
            if entries.insert(name, child).is_some() {
                return Err(SourceError::DuplicateKey {
                    key: key.clone(),
                    dir: dir.to_path_buf(),
                });
            }
        }
        Ok(entries)
    }

    /// Validate the whole tree before anything on disk is touched. A foreign
    /// file standing where a container's directory belongs is kept on save,
    /// so it is rejected here rather than halfway through the write.
    fn check(&self, children: &Children, dir: &Path) -> SourceResult<()> {
        for (name, child) in self.plan(children, dir)? {
            if let NestedMap::Container(grandchildren) = child {
                let target = dir.join(&name);
                if let Ok(meta) = fs::symlink_metadata(&target) {
                    if !meta.is_dir() && self.is_foreign(Some(&name), false) {
                        return Err(SourceError::NotADirectory(target));
                    }
                }
                self.check(grandchildren, &target)?;
            }
        }
        Ok(())
    }

    fn write_container(
        &self,
        children: &Children,
        dir: &Path,
        credential: Option<&Credential>,
    ) -> SourceResult<()> {
        let entries = self.plan(children, dir)?;
        self.remove_stale(dir, &entries)?;

        for (name, child) in entries {
            let target = dir.join(&name);
            match child {
                NestedMap::Leaf(value) => {
                    let data = seal(self.layout.encode_leaf(value)?, credential)?;
                    write_atomic(&target, &data, credential.is_some())?;
                }
                NestedMap::Container(grandchildren) => {
                    match fs::create_dir(&target) {
                        Ok(()) => {}
                        Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                        Err(err) => return Err(SourceError::unavailable(&target, err)),
                    }
                    self.write_container(grandchildren, &target, credential)?;
                }
            }
        }
        Ok(())
    }

    /// Remove entries of `dir` that are absent from `entries` or whose kind
    /// changed between file and directory.
    fn remove_stale(
        &self,
        dir: &Path,
        entries: &BTreeMap<String, &NestedMap>,
    ) -> SourceResult<()> {
        let listing = fs::read_dir(dir).map_err(|e| SourceError::unavailable(dir, e))?;
        for entry in listing {
            let entry = entry.map_err(|e| SourceError::unavailable(dir, e))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| SourceError::unavailable(&path, e))?;
            let file_name = entry.file_name();
            let name = file_name.to_str();

            let wanted = name
                .and_then(|name| entries.get(name))
                .is_some_and(|child| child.is_container() == file_type.is_dir());
            if wanted || self.is_foreign(name, file_type.is_dir()) {
                continue;
            }

            let removed = if file_type.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| SourceError::unavailable(&path, e))?;
            debug!(path = %path.display(), "stale entry removed");
        }
        Ok(())
    }

    /// The credential that opens the leaves, or `None` for a plain directory.
    fn open_marker<'c>(
        &self,
        credential: Option<&'c Credential>,
    ) -> SourceResult<Option<&'c Credential>> {
        let path = self.root.join(SEAL_MARKER);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SourceError::unavailable(&path, err)),
        };
        let credential =
            credential.ok_or_else(|| SourceError::CredentialRequired(self.root.clone()))?;
        if Envelope::open(credential, &bytes)? != SEAL_CHECK {
            return Err(CryptoError::CredentialInvalid.into());
        }
        Ok(Some(credential))
    }

    fn write_marker(&self, credential: Option<&Credential>) -> SourceResult<()> {
        let path = self.root.join(SEAL_MARKER);
        match credential {
            Some(credential) => {
                write_atomic(&path, &Envelope::seal(credential, SEAL_CHECK)?, true)
            }
            None => match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(SourceError::unavailable(&path, err)),
            },
        }
    }
}

impl TreeStore for DirectoryStore {
    fn load(&self, credential: Option<&Credential>) -> SourceResult<NestedMap> {
        let meta = fs::metadata(&self.root).map_err(|e| SourceError::unavailable(&self.root, e))?;
        if !meta.is_dir() {
            return Err(SourceError::NotADirectory(self.root.clone()));
        }
        let sealed = self.open_marker(credential)?;

        let mut tree = NestedMap::new();
        let walk = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != SEAL_MARKER);
        for entry in walk {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;
            let file_type = entry.file_type();
            if !file_type.is_dir() && !file_type.is_file() {
                warn!(
                    path = %entry.path().display(),
                    "skipping entry that is neither file nor directory"
                );
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(key_path) = self.key_path(relative, file_type.is_dir())? else {
                warn!(path = %entry.path().display(), "skipping file without leaf extension");
                continue;
            };

            let node = if file_type.is_dir() {
                NestedMap::new()
            } else {
                let bytes = fs::read(entry.path())
                    .map_err(|e| SourceError::unavailable(entry.path(), e))?;
                let bytes = match sealed {
                    Some(credential) => Envelope::open(credential, &bytes)?,
                    None => bytes,
                };
                NestedMap::Leaf(self.layout.decode_leaf(bytes, entry.path())?)
            };
            attach(&mut tree, &key_path, node, entry.path())?;
        }

        debug!(
            root = %self.root.display(),
            leaves = tree.leaf_count(),
            sealed = sealed.is_some(),
            "directory source read"
        );
        Ok(tree)
    }

    fn save(&self, tree: &NestedMap, credential: Option<&Credential>) -> SourceResult<()> {
        let children = tree.children().map_err(|_| SourceError::RootNotContainer)?;
        self.check(children, &self.root)?;

        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(SourceError::NotADirectory(self.root.clone())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&self.root)
                    .map_err(|e| SourceError::unavailable(&self.root, e))?;
            }
            Err(err) => return Err(SourceError::unavailable(&self.root, err)),
        }

        self.write_container(children, &self.root, credential)?;
        self.write_marker(credential)?;
        debug!(
            root = %self.root.display(),
            leaves = tree.leaf_count(),
            sealed = credential.is_some(),
            "directory source written"
        );
        Ok(())
    }
}

/// Insert a freshly loaded node under its already loaded parent.
fn attach(
    tree: &mut NestedMap,
    key_path: &KeyPath,
    node: NestedMap,
    fs_path: &Path,
) -> SourceResult<()> {
    let (Some(parent), Some(key)) = (key_path.parent(), key_path.last()) else {
        return Ok(());
    };
    let children = ops::get_mut(tree, &parent)?.children_mut()?;
    match children.entry(key.to_string()) {
        Entry::Occupied(_) => Err(SourceError::DuplicateKey {
            key: key.to_string(),
            dir: fs_path.parent().unwrap_or(fs_path).to_path_buf(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(node);
            Ok(())
        }
    }
}

fn validate_key(key: &str) -> SourceResult<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key == "." || key == ".." {
        "key is a reserved file name"
    } else if key == SEAL_MARKER {
        "key is the seal marker file name"
    } else if key.contains(['/', '\\']) {
        "key contains a path separator"
    } else if key.contains('\0') {
        "key contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(SourceError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

fn walk_error(root: &Path, err: walkdir::Error) -> SourceError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "filesystem loop detected"));
    SourceError::Unavailable { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_codec::Format;
    use nest_map::{tree, Value};
    use proptest::prelude::*;

    use crate::config::LeafEncoding;

    fn layout(ext: Option<&str>) -> DirectoryLayout {
        DirectoryLayout {
            leaf_extension: ext.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample() -> NestedMap {
        tree!({
            "binary": (vec![245u8, 107, 95, 100]),
            "foo": "bar",
            "nested": { "deep": { "deepest": "value" }, "foo": "baz" },
        })
    }

    #[test]
    fn mirrors_tree_with_leaf_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), layout(Some("leaf")));
        store.save(&tree!({ "a": { "b": "x" } }), None).unwrap();

        assert!(dir.path().join("a").is_dir());
        assert_eq!(fs::read(dir.path().join("a/b.leaf")).unwrap(), b"x");
        assert_eq!(store.load(None).unwrap(), tree!({ "a": { "b": "x" } }));
    }

    #[test]
    fn roundtrip_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        store.save(&sample(), None).unwrap();
        assert_eq!(fs::read(dir.path().join("nested/deep/deepest")).unwrap(), b"value");
        assert_eq!(store.load(None).unwrap(), sample());
    }

    #[test]
    fn save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("new/store"), DirectoryLayout::default());
        store.save(&sample(), None).unwrap();
        assert_eq!(store.load(None).unwrap(), sample());
    }

    #[test]
    fn stale_entries_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        store.save(&sample(), None).unwrap();
        store.save(&tree!({ "foo": "bar" }), None).unwrap();

        assert!(!dir.path().join("nested").exists());
        assert!(!dir.path().join("binary").exists());
        assert_eq!(store.load(None).unwrap(), tree!({ "foo": "bar" }));
    }

    #[test]
    fn kind_changes_replace_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        store.save(&tree!({ "a": "leaf", "b": { "c": "1" } }), None).unwrap();
        store.save(&tree!({ "a": { "x": "1" }, "b": "leaf" }), None).unwrap();

        assert!(dir.path().join("a").is_dir());
        assert!(dir.path().join("b").is_file());
        assert_eq!(
            store.load(None).unwrap(),
            tree!({ "a": { "x": "1" }, "b": "leaf" })
        );
    }

    #[test]
    fn foreign_files_skipped_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), b"not a leaf").unwrap();
        let store = DirectoryStore::new(dir.path(), layout(Some("leaf")));

        store.save(&tree!({ "k": "v" }), None).unwrap();
        assert_eq!(store.load(None).unwrap(), tree!({ "k": "v" }));
        assert!(dir.path().join("README.md").exists());
    }

    #[test]
    fn invalid_keys_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("store"), DirectoryLayout::default());
        for key in ["x/y", "..", "back\\slash"] {
            let tree = NestedMap::from_entries([
                ("ok".to_string(), NestedMap::leaf("1")),
                (key.to_string(), NestedMap::leaf("2")),
            ]);
            assert!(matches!(store.save(&tree, None), Err(SourceError::InvalidKey { .. })));
        }
        assert!(!dir.path().join("store").exists());
    }

    #[test]
    fn colliding_entry_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), layout(Some("leaf")));
        let tree = tree!({ "a": "leaf", "a.leaf": { "x": "1" } });
        assert!(matches!(store.save(&tree, None), Err(SourceError::DuplicateKey { .. })));
    }

    #[test]
    fn duplicate_keys_on_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/x.leaf"), b"1").unwrap();
        fs::write(dir.path().join("a.leaf"), b"2").unwrap();

        let store = DirectoryStore::new(dir.path(), layout(Some("leaf")));
        assert!(matches!(
            store.load(None),
            Err(SourceError::DuplicateKey { key, .. }) if key == "a"
        ));
    }

    #[test]
    fn empty_directories_load_as_empty_containers() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/inner")).unwrap();
        fs::write(dir.path().join("k"), b"v").unwrap();

        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        let mut loaded = store.load(None).unwrap();
        assert_eq!(loaded, tree!({ "empty": { "inner": {} }, "k": "v" }));
        loaded.prune();
        assert_eq!(loaded, tree!({ "k": "v" }));
    }

    #[test]
    fn root_must_be_container() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        assert!(matches!(
            store.save(&NestedMap::leaf("x"), None),
            Err(SourceError::RootNotContainer)
        ));
    }

    #[test]
    fn file_in_place_of_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain");
        fs::write(&path, b"x").unwrap();
        let store = DirectoryStore::new(&path, DirectoryLayout::default());
        assert!(matches!(store.load(None), Err(SourceError::NotADirectory(_))));
        assert!(matches!(store.save(&sample(), None), Err(SourceError::NotADirectory(_))));
    }

    #[test]
    fn missing_root_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("absent"), DirectoryLayout::default());
        assert!(matches!(store.load(None), Err(SourceError::Unavailable { .. })));
    }

    #[test]
    fn sealed_leaves() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        let credential = Credential::new("password");
        store.save(&sample(), Some(&credential)).unwrap();

        let raw = fs::read(dir.path().join("foo")).unwrap();
        assert!(Envelope::is_sealed(&raw));
        assert!(dir.path().join(SEAL_MARKER).is_file());
        assert!(matches!(store.load(None), Err(SourceError::CredentialRequired(_))));
        assert_eq!(store.load(Some(&credential)).unwrap(), sample());
    }

    #[test]
    fn sealed_directory_rejects_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        store.save(&sample(), Some(&Credential::new("right"))).unwrap();
        assert!(matches!(
            store.load(Some(&Credential::new("wrong"))),
            Err(SourceError::Crypto(CryptoError::CredentialInvalid))
        ));
    }

    #[test]
    fn plain_leaf_with_envelope_magic_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        let tree = tree!({ "note": "NSTE is our team acronym" });

        store.save(&tree, None).unwrap();
        assert_eq!(store.load(None).unwrap(), tree);
        assert_eq!(store.load(Some(&Credential::new("unused"))).unwrap(), tree);
    }

    #[test]
    fn saving_without_credential_unseals() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        store.save(&sample(), Some(&Credential::new("pw"))).unwrap();
        store.save(&sample(), None).unwrap();

        assert!(!dir.path().join(SEAL_MARKER).exists());
        assert_eq!(fs::read(dir.path().join("foo")).unwrap(), b"bar");
        assert_eq!(store.load(None).unwrap(), sample());
    }

    #[test]
    fn seal_marker_is_not_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        let tree = NestedMap::from_entries([(SEAL_MARKER.to_string(), NestedMap::leaf("x"))]);
        assert!(matches!(store.save(&tree, None), Err(SourceError::InvalidKey { .. })));
    }

    #[test]
    fn deleting_every_leaf_removes_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/b.leaf"), b"1").unwrap();
        fs::write(dir.path().join("a/c.leaf"), b"2").unwrap();

        let store = DirectoryStore::new(dir.path(), layout(Some("leaf")));
        let mut loaded = store.load(None).unwrap();
        assert_eq!(loaded, tree!({ "a": { "b": "1", "c": "2" } }));

        ops::delete(&mut loaded, &KeyPath::parse("a.b")).unwrap();
        ops::delete(&mut loaded, &KeyPath::parse("a.c")).unwrap();
        assert_eq!(loaded, NestedMap::new());
        store.save(&loaded, None).unwrap();

        assert!(!dir.path().join("a").exists());
        assert_eq!(store.load(None).unwrap(), NestedMap::new());
    }

    #[test]
    fn foreign_file_blocking_container_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x"), b"foreign").unwrap();
        let store = DirectoryStore::new(dir.path(), layout(Some("leaf")));

        let tree = tree!({ "a": "1", "x": { "y": "2" } });
        assert!(matches!(store.save(&tree, None), Err(SourceError::NotADirectory(_))));
        assert!(!dir.path().join("a.leaf").exists());
        assert_eq!(fs::read(dir.path().join("x")).unwrap(), b"foreign");
    }

    #[test]
    fn codec_leaf_encoding_keeps_binary_kind() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DirectoryLayout {
            leaf_extension: Some("json".into()),
            leaf_encoding: LeafEncoding::Codec(Format::Json),
        };
        let store = DirectoryStore::new(dir.path(), layout);
        let tree = tree!({ "b": (b"ascii".to_vec()), "t": "text" });
        store.save(&tree, None).unwrap();
        assert_eq!(fs::read(dir.path().join("t.json")).unwrap(), b"\"text\"\n");
        assert_eq!(store.load(None).unwrap(), tree);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real"), b"v").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let store = DirectoryStore::new(dir.path(), DirectoryLayout::default());
        assert_eq!(store.load(None).unwrap(), tree!({ "real": "v" }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_root_loads_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("k"), b"v").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = DirectoryStore::new(&link, DirectoryLayout::default());
        let mut loaded = store.load(None).unwrap();
        assert_eq!(loaded, tree!({ "k": "v" }));

        ops::update(&mut loaded, &KeyPath::parse("k"), NestedMap::leaf("w")).unwrap();
        store.save(&loaded, None).unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(real.join("k")).unwrap(), b"w");
    }

    fn arb_tree() -> impl Strategy<Value = NestedMap> {
        let leaf = prop_oneof![
            any::<String>().prop_map(|s| NestedMap::Leaf(Value::Text(s))),
            prop::collection::vec(any::<u8>(), 0..16)
                .prop_map(|b| NestedMap::Leaf(Value::Binary(b))),
        ];
        let tree = leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::btree_map("[a-z]{1,6}", inner, 1..4).prop_map(NestedMap::Container)
        });
        prop::collection::btree_map("[a-z]{1,6}", tree, 0..4).prop_map(NestedMap::Container)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn codec_leaves_roundtrip(tree in arb_tree()) {
            let dir = tempfile::tempdir().unwrap();
            let layout = DirectoryLayout {
                leaf_extension: Some("json".into()),
                leaf_encoding: LeafEncoding::Codec(Format::Json),
            };
            let store = DirectoryStore::new(dir.path().join("store"), layout);
            store.save(&tree, None).unwrap();
            prop_assert_eq!(&store.load(None).unwrap(), &tree);
        }
    }
}
