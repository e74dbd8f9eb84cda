use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator used in the textual form of a path.
pub const SEPARATOR: char = '.';

/// An ordered sequence of keys addressing a node from the root.
///
/// The empty path denotes the root itself. Parsing drops empty segments, so
/// `""`, `"."` and `"a..b"` are accepted and normalize to the root and
/// `a.b` respectively.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from explicit segments. Segments are kept verbatim.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse the dotted textual form.
    pub fn parse(text: &str) -> Self {
        Self(
            text.split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The final key, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The path without its final key. The root has no parent.
    pub fn parent(&self) -> Option<KeyPath> {
        self.0
            .split_last()
            .map(|(_, init)| Self(init.to_vec()))
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> KeyPath {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return write!(f, "{SEPARATOR}");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dotted() {
        let path = KeyPath::parse("a.b.c");
        assert_eq!(path.segments(), &["a", "b", "c"]);
        assert_eq!(path.to_string(), "a.b.c");
    }

    #[test]
    fn parse_drops_empty_segments() {
        assert_eq!(KeyPath::parse("a..b."), KeyPath::new(["a", "b"]));
        assert!(KeyPath::parse("").is_root());
        assert!(KeyPath::parse(".").is_root());
        assert!(KeyPath::parse("...").is_root());
    }

    #[test]
    fn root_displays_as_separator() {
        assert_eq!(KeyPath::root().to_string(), ".");
    }

    #[test]
    fn parent_and_prefix() {
        let path = KeyPath::parse("a.b.c");
        assert_eq!(path.parent(), Some(KeyPath::parse("a.b")));
        assert_eq!(path.prefix(1), KeyPath::parse("a"));
        assert_eq!(path.prefix(9), path);
        assert_eq!(path.last(), Some("c"));
        assert_eq!(KeyPath::root().parent(), None);
    }

    #[test]
    fn from_str_never_fails() {
        let path: KeyPath = "x.y".parse().unwrap();
        assert_eq!(path, KeyPath::new(["x", "y"]));
    }
}
