//! Path operations over a [`NestedMap`] root.
//!
//! Every mutation keeps the tree pruned: no container other than the root is
//! ever left empty, and a failed operation leaves the tree untouched.

use std::collections::BTreeMap;

use crate::error::{MapError, MapResult};
use crate::node::{NestedMap, NodeKind};
use crate::path::KeyPath;

/// How [`set`] treats existing content at the target path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// The path must be empty; missing intermediate containers are created.
    Create,
    /// The path must already hold a value, which is replaced.
    Update,
}

/// Resolve `path` to the node it addresses.
pub fn get<'a>(root: &'a NestedMap, path: &KeyPath) -> MapResult<&'a NestedMap> {
    let mut node = root;
    for (depth, key) in path.segments().iter().enumerate() {
        node = match node {
            NestedMap::Container(children) => children
                .get(key)
                .ok_or_else(|| MapError::PathNotFound(path.clone()))?,
            NestedMap::Leaf(_) => return Err(through_leaf(path, depth)),
        };
    }
    Ok(node)
}

/// Resolve `path` to a mutable node.
pub fn get_mut<'a>(root: &'a mut NestedMap, path: &KeyPath) -> MapResult<&'a mut NestedMap> {
    let mut node = root;
    for (depth, key) in path.segments().iter().enumerate() {
        node = match node {
            NestedMap::Container(children) => match children.get_mut(key) {
                Some(child) => child,
                None => return Err(MapError::PathNotFound(path.clone())),
            },
            NestedMap::Leaf(_) => return Err(through_leaf(path, depth)),
        };
    }
    Ok(node)
}

/// Returns `true` if `path` resolves to a node.
pub fn exists(root: &NestedMap, path: &KeyPath) -> bool {
    get(root, path).is_ok()
}

/// Write `value` at `path` according to `mode`.
///
/// The value is pruned before insertion. An update with an empty container
/// is a delete; a create with one is rejected. At the root only containers
/// are accepted: a create requires the root to be empty and an update
/// replaces the whole tree.
pub fn set(
    root: &mut NestedMap,
    path: &KeyPath,
    mut value: NestedMap,
    mode: WriteMode,
) -> MapResult<()> {
    value.prune();
    if path.is_root() {
        return set_root(root, value, mode);
    }
    match mode {
        WriteMode::Create => insert_new(root, path, value),
        WriteMode::Update if value.is_empty_container() => delete(root, path).map(drop),
        WriteMode::Update => {
            *get_mut(root, path)? = value;
            Ok(())
        }
    }
}

/// Shorthand for [`set`] with [`WriteMode::Create`].
pub fn create(root: &mut NestedMap, path: &KeyPath, value: NestedMap) -> MapResult<()> {
    set(root, path, value, WriteMode::Create)
}

/// Shorthand for [`set`] with [`WriteMode::Update`].
pub fn update(root: &mut NestedMap, path: &KeyPath, value: NestedMap) -> MapResult<()> {
    set(root, path, value, WriteMode::Update)
}

/// Remove the node at `path` and return it.
///
/// Ancestors left empty by the removal are removed too, up to but excluding
/// the root. Deleting the root clears the tree; an already empty root counts
/// as nothing to delete.
pub fn delete(root: &mut NestedMap, path: &KeyPath) -> MapResult<NestedMap> {
    if path.is_root() {
        if root.is_empty_container() {
            return Err(MapError::PathNotFound(path.clone()));
        }
        return Ok(std::mem::take(root));
    }
    remove_pruning(root, path.segments(), path, 0)
}

fn set_root(root: &mut NestedMap, value: NestedMap, mode: WriteMode) -> MapResult<()> {
    if value.is_leaf() {
        return Err(MapError::TypeMismatch {
            expected: NodeKind::Container,
            found: NodeKind::Leaf,
        });
    }
    match mode {
        WriteMode::Create if value.is_empty_container() => {
            Err(MapError::EmptyValue(KeyPath::root()))
        }
        WriteMode::Create if !root.is_empty_container() => {
            Err(MapError::AlreadyExists(KeyPath::root()))
        }
        WriteMode::Update if value.is_empty_container() => {
            delete(root, &KeyPath::root()).map(drop)
        }
        WriteMode::Create | WriteMode::Update => {
            *root = value;
            Ok(())
        }
    }
}

/// Attach `value` at a currently empty `path`.
///
/// The whole path is validated before anything is touched. Missing
/// intermediate containers are assembled around the value and attached in a
/// single insert, so no empty container is ever observable.
fn insert_new(root: &mut NestedMap, path: &KeyPath, value: NestedMap) -> MapResult<()> {
    if value.is_empty_container() {
        return Err(MapError::EmptyValue(path.clone()));
    }
    let existing = existing_depth(root, path)?;
    let (present, missing) = path.segments().split_at(existing);
    let Some((first, rest)) = missing.split_first() else {
        return Err(MapError::AlreadyExists(path.clone()));
    };

    let subtree = rest.iter().rev().fold(value, |child, key| {
        NestedMap::Container(BTreeMap::from([(key.clone(), child)]))
    });
    let parent = get_mut(root, &KeyPath::new(present.iter().cloned()))?;
    parent.insert_child(first.clone(), subtree)?;
    Ok(())
}

/// Count the leading segments of `path` that already exist as containers.
fn existing_depth(root: &NestedMap, path: &KeyPath) -> MapResult<usize> {
    let mut node = root;
    for (depth, key) in path.segments().iter().enumerate() {
        let NestedMap::Container(children) = node else {
            return Err(through_leaf(path, depth));
        };
        match children.get(key) {
            Some(child) => node = child,
            None => return Ok(depth),
        }
    }
    Err(MapError::AlreadyExists(path.clone()))
}

fn remove_pruning(
    node: &mut NestedMap,
    segments: &[String],
    path: &KeyPath,
    depth: usize,
) -> MapResult<NestedMap> {
    let NestedMap::Container(children) = node else {
        return Err(through_leaf(path, depth));
    };
    let Some((key, rest)) = segments.split_first() else {
        return Err(MapError::PathNotFound(path.clone()));
    };
    if rest.is_empty() {
        return children
            .remove(key)
            .ok_or_else(|| MapError::PathNotFound(path.clone()));
    }

    let child = children
        .get_mut(key)
        .ok_or_else(|| MapError::PathNotFound(path.clone()))?;
    let removed = remove_pruning(child, rest, path, depth + 1)?;
    if child.is_empty_container() {
        children.remove(key);
    }
    Ok(removed)
}

fn through_leaf(path: &KeyPath, depth: usize) -> MapError {
    MapError::PathThroughLeaf {
        path: path.clone(),
        leaf: path.prefix(depth),
    }
}
