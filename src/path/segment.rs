//! In-memory representation of a field path.
//!
//! A [`Path`] is a singly linked chain of segments. Each segment optionally
//! looks up a key in a mapping, then says what the next hop expects: another
//! mapping ([`SegmentKind::Object`]), a sequence ([`SegmentKind::Array`]), or
//! nothing because this is the addressed value ([`SegmentKind::Element`]).
//!
//! ```
//! use fieldwalk::path::Path;
//!
//! let path: Path = "users[].email".parse().unwrap();
//! assert_eq!(path.depth(), 3);
//! assert!(path.has_array());
//! assert_eq!(path.truncate(1).unwrap().to_string(), "users");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::GrammarError;

/// Index slot of an array segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// Wildcard as written in the path text.
    Unbound,
    /// Wildcard normalized by [`Path::bind_all_wildcards`]; iterated by the walker.
    Wildcard,
    /// Exact element.
    Bound(usize),
}

impl Index {
    /// Returns the concrete index, if one is bound.
    pub fn bound(&self) -> Option<usize> {
        match self {
            Index::Bound(i) => Some(*i),
            Index::Unbound | Index::Wildcard => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Index::Bound(_))
    }
}

/// What the hop after a segment expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// The next segment is a mapping-key lookup.
    Object,
    /// The next segment indexes or iterates a sequence.
    Array(Index),
    /// Terminal leaf: the addressed value.
    Element,
}

/// A segment of a field path, owning the rest of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub name: Option<String>,
    pub kind: SegmentKind,
    pub next: Option<Box<Path>>,
}

impl Path {
    /// Creates a terminal segment.
    pub fn element(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            kind: SegmentKind::Element,
            next: None,
        }
    }

    /// Creates a segment expecting a mapping, followed by `next`.
    pub fn object(name: Option<&str>, next: Path) -> Self {
        Self {
            name: name.map(str::to_string),
            kind: SegmentKind::Object,
            next: Some(Box::new(next)),
        }
    }

    /// Creates a wildcard array segment followed by `next`.
    pub fn array(name: Option<&str>, next: Path) -> Self {
        Self {
            name: name.map(str::to_string),
            kind: SegmentKind::Array(Index::Unbound),
            next: Some(Box::new(next)),
        }
    }

    /// Creates an array segment addressing exactly one element.
    pub fn array_at(name: Option<&str>, index: usize, next: Path) -> Self {
        Self {
            name: name.map(str::to_string),
            kind: SegmentKind::Array(Index::Bound(index)),
            next: Some(Box::new(next)),
        }
    }

    /// Parses a path from its textual form.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        super::parser::parse(text)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn next(&self) -> Option<&Path> {
        self.next.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// Returns the index slot if this is an array segment.
    pub fn index(&self) -> Option<Index> {
        match self.kind {
            SegmentKind::Array(index) => Some(index),
            _ => None,
        }
    }

    /// Iterates over the segments of the chain, starting with `self`.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            current: Some(self),
        }
    }

    /// Returns true if any segment of the chain is an array dimension.
    pub fn has_array(&self) -> bool {
        self.segments()
            .any(|segment| matches!(segment.kind, SegmentKind::Array(_)))
    }

    /// Returns the segment preceding the terminal one, or `None` if `self` is terminal.
    pub fn last_parent(&self) -> Option<&Path> {
        let mut current = self;
        let mut parent = None;
        while let Some(next) = current.next() {
            parent = Some(current);
            current = next;
        }
        parent
    }

    /// Returns the terminal segment of the chain.
    pub fn tail(&self) -> &Path {
        let mut current = self;
        while let Some(next) = current.next() {
            current = next;
        }
        current
    }

    /// Number of segments in the chain, terminal included.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns a copy of the first `n` segments, the `n`-th becoming the terminal.
    ///
    /// Returns `None` for `n == 0` and an identical copy when `n` covers the
    /// whole chain.
    pub fn truncate(&self, n: usize) -> Option<Path> {
        if n == 0 {
            return None;
        }
        let mut truncated = self.clone();
        if let Some(last) = truncated.nth_mut(n - 1) {
            if last.next.is_some() {
                last.kind = SegmentKind::Element;
                last.next = None;
            }
        }
        Some(truncated)
    }

    /// Gives every unbound array segment a wildcard slot.
    pub fn bind_all_wildcards(&mut self) {
        let mut current = Some(self);
        while let Some(segment) = current {
            if segment.kind == SegmentKind::Array(Index::Unbound) {
                segment.kind = SegmentKind::Array(Index::Wildcard);
            }
            current = segment.next.as_deref_mut();
        }
    }

    /// Returns the `n`-th segment (zero-based) for in-place edits.
    pub(crate) fn nth_mut(&mut self, n: usize) -> Option<&mut Path> {
        let mut current = self;
        for _ in 0..n {
            current = current.next.as_deref_mut()?;
        }
        Some(current)
    }
}

/// Iterator over the segments of a [`Path`].
pub struct Segments<'a> {
    current: Option<&'a Path>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.current?;
        self.current = segment.next();
        Some(segment)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in self.segments() {
            if let Some(name) = segment.name() {
                if !first {
                    f.write_str(".")?;
                }
                f.write_str(name)?;
            }
            if let SegmentKind::Array(index) = segment.kind {
                match index {
                    Index::Bound(i) => write!(f, "[{}]", i)?,
                    Index::Unbound | Index::Wildcard => f.write_str("[]")?,
                }
            }
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Path::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Path {
        Path::object(
            Some("object"),
            Path::array(Some("array"), Path::element(None)),
        )
    }

    #[test]
    fn test_has_array() {
        let path = sample();
        assert!(path.has_array());
        assert!(!path.tail().has_array());
        assert!(!Path::object(Some("a"), Path::element(Some("b"))).has_array());
    }

    #[test]
    fn test_last_parent() {
        let path = sample();
        assert_eq!(path.last_parent(), path.next());
        assert_eq!(path.tail().last_parent(), None);
    }

    #[test]
    fn test_tail() {
        let path = sample();
        let tail = path.next().unwrap().next().unwrap();
        assert_eq!(path.tail(), tail);
        assert_eq!(tail.tail(), tail);
    }

    #[test]
    fn test_clone_is_independent() {
        let path = Path::object(
            Some("object"),
            Path::array_at(Some("array"), 1, Path::element(None)),
        );
        let mut clone = path.clone();
        assert_eq!(path, clone);

        clone.nth_mut(1).unwrap().kind = SegmentKind::Array(Index::Bound(7));
        assert_eq!(path.next().unwrap().index(), Some(Index::Bound(1)));
        assert_ne!(path, clone);
    }

    #[test]
    fn test_bind_all_wildcards() {
        let mut path = Path::array(
            Some("array"),
            Path::object(
                Some("object"),
                Path::array(Some("field"), Path::element(None)),
            ),
        );
        path.bind_all_wildcards();

        assert_eq!(path.index(), Some(Index::Wildcard));
        assert_eq!(path.nth_mut(1).unwrap().index(), None);
        assert_eq!(path.nth_mut(2).unwrap().index(), Some(Index::Wildcard));
    }

    #[test]
    fn test_bind_all_wildcards_keeps_bound_indices() {
        let mut path = Path::array_at(Some("array"), 3, Path::element(None));
        path.bind_all_wildcards();
        assert_eq!(path.index(), Some(Index::Bound(3)));
    }

    #[test]
    fn test_display_bound_indices() {
        let path = Path::array_at(
            Some("array"),
            1,
            Path::object(None, Path::array_at(Some("field"), 1, Path::element(None))),
        );
        assert_eq!(path.to_string(), "array[1].field[1]");
    }

    #[test]
    fn test_display_wildcard_slot() {
        let mut path = sample();
        path.bind_all_wildcards();
        assert_eq!(path.to_string(), "object.array[]");
    }

    #[test]
    fn test_truncate_zero_is_none() {
        assert_eq!(sample().truncate(0), None);
    }
}
