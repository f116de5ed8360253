//! Attribute path representation and parsing.
//!
//! Paths are sequences of segments that describe a location in a shadow tree.
//! Each segment is either a key (for mappings) or an index (for sequences).
//! Path strings use `.` between keys and `[n]` for indices, e.g.
//! `"name.firstname"` or `"roles[1]"`.

use crate::{MutationError, MutationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single segment in an attribute path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Mapping key access.
    Key(String),
    /// Sequence index access: `[index]`.
    ///
    /// Against a mapping the index addresses its decimal key.
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Create an index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// Classify a dotted segment: canonical integer literals become indices.
    ///
    /// `"0"` and `"12"` are indices, `"007"` and `"-1"` stay keys.
    pub fn from_text(text: &str) -> Self {
        match canonical_index(text) {
            Some(i) => Seg::Index(i),
            None => Seg::Key(text.to_owned()),
        }
    }

    /// Returns true if this is an index segment.
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Seg::Index(_))
    }

    /// The mapping key this segment addresses.
    pub fn to_key(&self) -> String {
        match self {
            Seg::Key(k) => k.clone(),
            Seg::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, "{}", k),
            Seg::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

fn canonical_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

/// A complete path into a shadow tree.
///
/// # Examples
///
/// ```
/// use tirea_mutation::{parse_path, Path};
///
/// let path = Path::root().key("users").index(0).key("name");
/// assert_eq!(path, parse_path("users[0].name").unwrap());
/// assert_eq!(path.to_string(), "users[0].name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Create a path from already split segments.
    ///
    /// Each item is one segment taken literally (no `.`/`[]` tokenizing);
    /// canonical integer literals become indices.
    pub fn from_keys<I, S>(keys: I) -> MutationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path: Path = keys
            .into_iter()
            .map(|k| Seg::from_text(k.as_ref()))
            .collect();
        if path.is_empty() {
            return Err(MutationError::malformed_path("", "empty path"));
        }
        Ok(path)
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment and return self (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Append a segment and return a new path (non-mutating builder).
    #[inline]
    pub fn with_segment(&self, seg: Seg) -> Path {
        let mut result = self.clone();
        result.0.push(seg);
        result
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 && !seg.is_index() {
                write!(f, ".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a dot/bracket path string into a [`Path`].
///
/// # Examples
///
/// ```
/// use tirea_mutation::{parse_path, Seg};
///
/// let path = parse_path("a.b[2].c").unwrap();
/// assert_eq!(
///     path.segments(),
///     &[Seg::key("a"), Seg::key("b"), Seg::index(2), Seg::key("c")]
/// );
///
/// assert!(parse_path("a..b").is_err());
/// assert!(parse_path("roles[x]").is_err());
/// ```
pub fn parse_path(input: &str) -> MutationResult<Path> {
    if input.is_empty() {
        return Err(MutationError::malformed_path(input, "empty path"));
    }

    let bytes = input.as_bytes();
    let mut path = Path::root();
    let mut pos = 0;

    loop {
        if bytes[pos] == b'[' {
            let close = input[pos..]
                .find(']')
                .map(|offset| pos + offset)
                .ok_or_else(|| {
                    MutationError::malformed_path(input, format!("unclosed '[' at offset {pos}"))
                })?;
            let digits = &input[pos + 1..close];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(MutationError::malformed_path(
                    input,
                    format!("expected a non-negative integer index at offset {}", pos + 1),
                ));
            }
            let index = digits.parse::<usize>().map_err(|_| {
                MutationError::malformed_path(input, format!("index {digits} is out of range"))
            })?;
            path.push(Seg::Index(index));
            pos = close + 1;
        } else {
            let end = input[pos..]
                .find(|c: char| matches!(c, '.' | '[' | ']'))
                .map_or(input.len(), |offset| pos + offset);
            if end < input.len() && bytes[end] == b']' {
                return Err(MutationError::malformed_path(
                    input,
                    format!("unexpected ']' at offset {end}"),
                ));
            }
            if end == pos {
                return Err(MutationError::malformed_path(
                    input,
                    format!("empty segment at offset {pos}"),
                ));
            }
            path.push(Seg::from_text(&input[pos..end]));
            pos = end;
        }

        if pos == input.len() {
            return Ok(path);
        }

        match bytes[pos] {
            b'.' => {
                pos += 1;
                if pos == input.len() {
                    return Err(MutationError::malformed_path(input, "trailing '.'"));
                }
            }
            b'[' => {}
            other => {
                return Err(MutationError::malformed_path(
                    input,
                    format!(
                        "expected '.' or '[' at offset {pos}, found {:?}",
                        other as char
                    ),
                ));
            }
        }
    }
}

/// Conversion into a [`Path`]: path strings are parsed, paths and already
/// split segment lists are taken as-is.
pub trait IntoPath {
    /// Convert into a path, failing on malformed path strings.
    fn into_path(self) -> MutationResult<Path>;
}

impl IntoPath for Path {
    fn into_path(self) -> MutationResult<Path> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> MutationResult<Path> {
        Ok(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> MutationResult<Path> {
        parse_path(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> MutationResult<Path> {
        parse_path(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> MutationResult<Path> {
        parse_path(self)
    }
}

impl IntoPath for &[&str] {
    fn into_path(self) -> MutationResult<Path> {
        Path::from_keys(self)
    }
}

impl IntoPath for &[String] {
    fn into_path(self) -> MutationResult<Path> {
        Path::from_keys(self)
    }
}

impl IntoPath for Vec<&str> {
    fn into_path(self) -> MutationResult<Path> {
        Path::from_keys(self)
    }
}

impl IntoPath for Vec<String> {
    fn into_path(self) -> MutationResult<Path> {
        Path::from_keys(self)
    }
}

/// Construct a `Path` from a sequence of segments.
///
/// # Examples
///
/// ```
/// use tirea_mutation::path;
///
/// // String literals become Key segments
/// let p = path!("name", "firstname");
///
/// // Numbers become Index segments
/// let p = path!("roles", 1);
/// assert_eq!(p.to_string(), "roles[1]");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::path!(@seg $seg));
        )+
        p
    }};
    (@seg $seg:expr) => {
        $crate::Seg::from($seg)
    };
}
