//! Field paths for addressing locations within a value graph
//!
//! Provides [`FieldPath`], the canonical identifier an override policy matches
//! against, and [`Segment`], one step of it.

use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One step of a [`FieldPath`]
///
/// # Rendering
/// - `Member("Name")` → `Name` (joined to the previous segment with `.`)
/// - `Index(0)` → `[0]`
/// - `Key("key")` → `[key]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Named member of a record
    Member(String),

    /// Position within an ordered sequence
    Index(usize),

    /// Rendered key of a keyed map
    Key(String),
}

impl Segment {
    /// Member segment
    #[inline]
    #[must_use]
    pub fn member(name: impl Into<String>) -> Self {
        Self::Member(name.into())
    }

    /// Index segment
    #[inline]
    #[must_use]
    pub fn index(position: usize) -> Self {
        Self::Index(position)
    }

    /// Key segment from an already rendered key
    #[inline]
    #[must_use]
    pub fn key(rendered: impl Into<String>) -> Self {
        Self::Key(rendered.into())
    }

    /// Whether this segment renders inside brackets
    #[inline]
    #[must_use]
    pub fn is_bracketed(&self) -> bool {
        !matches!(self, Self::Member(_))
    }

    /// Parse the text between `[` and `]`
    ///
    /// All-digit text that fits a `usize` is an index; anything else is a key.
    fn from_bracket(inner: &str) -> Self {
        if inner.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(position) = inner.parse() {
                return Self::Index(position);
            }
        }
        Self::Key(inner.to_string())
    }

    fn write_to(&self, f: &mut impl Write, leading: bool) -> fmt::Result {
        match self {
            Self::Member(name) => {
                if leading {
                    f.write_char('.')?;
                }
                f.write_str(name)
            }
            Self::Index(position) => write!(f, "[{position}]"),
            Self::Key(key) => write!(f, "[{key}]"),
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_to(f, false)
    }
}

/// Path to a location within a value graph
///
/// Immutable: [`append`](Self::append) and its shorthands return a new path
/// holding the parent's segments plus one more.
///
/// # Equality
/// Two paths are equal when their canonical renderings are equal, so the
/// parsed path `a[0]` equals a path built with `Segment::Key("0")`.
///
/// # Examples
/// - `[Member("PropertyB"), Member("ListProp"), Index(0)]` → `PropertyB.ListProp[0]`
/// - `[Member("DictProp"), Key("key"), Member("Name")]` → `DictProp[key].Name`
#[derive(Debug, Clone, Default)]
pub struct FieldPath(SmallVec<[Segment; 8]>);

impl FieldPath {
    /// Empty path (root), rendering to `""`
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(SmallVec::from_vec(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Check if path is the root
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn append(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Append a member segment
    #[inline]
    #[must_use]
    pub fn member(&self, name: impl Into<String>) -> Self {
        self.append(Segment::member(name))
    }

    /// Append an index segment
    #[inline]
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        self.append(Segment::index(position))
    }

    /// Append a key segment
    #[inline]
    #[must_use]
    pub fn key(&self, rendered: impl Into<String>) -> Self {
        self.append(Segment::key(rendered))
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].into()))
        }
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// Check if this path is a prefix of another
    ///
    /// Segments are compared by rendering, like whole paths.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.to_string() == b.to_string())
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            segment.write_to(f, position > 0)?;
        }
        Ok(())
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for FieldPath {}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl Hash for FieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    /// Parse canonical notation such as `PropertyB.ListProp[0].DictProp[key]`
    ///
    /// A bracket runs to the next `]`, so keys containing `]` cannot be
    /// expressed. Member names end at `.`, `[` or `]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments: SmallVec<[Segment; 8]> = SmallVec::new();
        let mut rest = s;

        while !rest.is_empty() {
            let name_end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
            let name = &rest[..name_end];
            if name.is_empty() {
                // Only a path that starts with a bracket may omit the member.
                if !(segments.is_empty() && rest.starts_with('[')) {
                    return Err(PathError::EmptySegment);
                }
            } else {
                segments.push(Segment::Member(name.to_string()));
            }
            rest = &rest[name_end..];

            while let Some(after) = rest.strip_prefix('[') {
                let close = after
                    .find(']')
                    .ok_or_else(|| PathError::UnterminatedBracket(s.to_string()))?;
                let inner = &after[..close];
                if inner.is_empty() {
                    return Err(PathError::EmptyBracket);
                }
                segments.push(Segment::from_bracket(inner));
                rest = &after[close + 1..];
            }

            match rest.chars().next() {
                None => break,
                Some('.') => {
                    rest = &rest[1..];
                    if rest.is_empty() {
                        return Err(PathError::EmptySegment);
                    }
                }
                Some(ch) => {
                    return Err(PathError::UnexpectedCharacter {
                        ch,
                        offset: s.len() - rest.len(),
                    });
                }
            }
        }

        Ok(Self(segments))
    }
}

impl From<Vec<Segment>> for FieldPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<Segment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors from parsing field path text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty member segment (`a..b`, trailing `.`)
    #[error("path contains empty segment")]
    EmptySegment,

    /// Brackets with nothing inside (`a[]`)
    #[error("path contains empty brackets")]
    EmptyBracket,

    /// `[` without a closing `]`
    #[error("unterminated bracket in path '{0}'")]
    UnterminatedBracket(String),

    /// Character that cannot follow the previous segment
    #[error("unexpected '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
}
