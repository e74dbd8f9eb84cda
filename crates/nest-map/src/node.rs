use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::value::Value;

/// Children of a container, ordered by key.
pub type Children = BTreeMap<String, NestedMap>;

/// Discriminant of a [`NestedMap`] node, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Container,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf => f.write_str("leaf"),
            Self::Container => f.write_str("container"),
        }
    }
}

/// A recursive tree of named values.
///
/// A node is either a terminal [`Value`] or a container of uniquely named
/// children. The tree is exclusively owned: every subtree belongs to exactly
/// one parent, so structural equality is plain value equality.
///
/// After any path operation no container other than the root is empty.
/// [`NestedMap::prune`] restores that shape for trees built by hand or
/// loaded from outside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NestedMap {
    Leaf(Value),
    Container(Children),
}

impl Default for NestedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedMap {
    /// An empty container, the shape of a fresh root.
    pub fn new() -> Self {
        Self::Container(Children::new())
    }

    /// A leaf holding `value`.
    pub fn leaf(value: impl Into<Value>) -> Self {
        Self::Leaf(value.into())
    }

    /// Build a container from `(key, child)` pairs. Later duplicates win.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, NestedMap)>,
    {
        Self::Container(entries.into_iter().collect())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Leaf(_) => NodeKind::Leaf,
            Self::Container(_) => NodeKind::Container,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Returns `true` only for a container with no children.
    pub fn is_empty_container(&self) -> bool {
        matches!(self, Self::Container(children) if children.is_empty())
    }

    /// The leaf payload, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Container(_) => None,
        }
    }

    /// The children of a container.
    pub fn children(&self) -> MapResult<&Children> {
        match self {
            Self::Container(children) => Ok(children),
            Self::Leaf(_) => Err(self.not_a_container()),
        }
    }

    /// Mutable access to the children of a container.
    pub fn children_mut(&mut self) -> MapResult<&mut Children> {
        match self {
            Self::Container(children) => Ok(children),
            Self::Leaf(_) => Err(MapError::TypeMismatch {
                expected: NodeKind::Container,
                found: NodeKind::Leaf,
            }),
        }
    }

    /// Number of direct children. Leaves have none.
    pub fn child_count(&self) -> usize {
        match self {
            Self::Container(children) => children.len(),
            Self::Leaf(_) => 0,
        }
    }

    /// Child keys in sorted order. Leaves yield nothing.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let children = match self {
            Self::Container(children) => Some(children),
            Self::Leaf(_) => None,
        };
        children.into_iter().flat_map(|c| c.keys().map(String::as_str))
    }

    /// Look up a direct child.
    pub fn child_at(&self, key: &str) -> MapResult<&NestedMap> {
        self.children()?
            .get(key)
            .ok_or_else(|| MapError::NotFound(key.to_string()))
    }

    /// Look up a direct child mutably.
    pub fn child_at_mut(&mut self, key: &str) -> MapResult<&mut NestedMap> {
        self.children_mut()?
            .get_mut(key)
            .ok_or_else(|| MapError::NotFound(key.to_string()))
    }

    /// Insert or replace a direct child, returning the previous one.
    pub fn insert_child(
        &mut self,
        key: impl Into<String>,
        child: NestedMap,
    ) -> MapResult<Option<NestedMap>> {
        Ok(self.children_mut()?.insert(key.into(), child))
    }

    /// Remove a direct child. Absent keys and leaves are a no-op.
    pub fn remove_child(&mut self, key: &str) -> Option<NestedMap> {
        match self {
            Self::Container(children) => children.remove(key),
            Self::Leaf(_) => None,
        }
    }

    /// Total number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Container(children) => children.values().map(NestedMap::leaf_count).sum(),
        }
    }

    /// Remove every empty container below this node, bottom-up.
    ///
    /// The node itself is never removed, so a container whose descendants
    /// were all empty ends up as an empty container. Returns the number of
    /// containers removed.
    pub fn prune(&mut self) -> usize {
        let Self::Container(children) = self else {
            return 0;
        };
        let mut removed = 0;
        children.retain(|_, child| {
            removed += child.prune();
            if child.is_empty_container() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    fn not_a_container(&self) -> MapError {
        MapError::TypeMismatch {
            expected: NodeKind::Container,
            found: self.kind(),
        }
    }
}

impl From<Value> for NestedMap {
    fn from(value: Value) -> Self {
        Self::Leaf(value)
    }
}

impl From<Children> for NestedMap {
    fn from(children: Children) -> Self {
        Self::Container(children)
    }
}

/// Build a [`NestedMap`] from a JSON-like literal.
///
/// Braced groups become containers; any other expression becomes a leaf via
/// `Into<Value>`. Wrap multi-token expressions in parentheses.
///
/// ```
/// use nest_map::tree;
///
/// let map = tree!({
///     "foo": "bar",
///     "nested": { "binary": (vec![0u8, 1, 2]) },
/// });
/// assert_eq!(map.leaf_count(), 2);
/// ```
#[macro_export]
macro_rules! tree {
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let entries: ::std::vec::Vec<(::std::string::String, $crate::NestedMap)> =
            ::std::vec![$((::std::string::String::from($key), $crate::tree!($value))),*];
        $crate::NestedMap::from_entries(entries)
    }};
    ($leaf:expr) => {
        $crate::NestedMap::leaf($leaf)
    };
}
