//! Path types for addressing positions inside heterogeneous trees.
//!
//! A path is a sequence of [`Key`]s, each one step of descent: an index into an
//! ordered sequence, or a name into a keyed mapping or a node's fields. The
//! [`Path`]/[`PathBuf`] types follow the same borrowed/owned pattern as
//! `std::path::Path`/`PathBuf`.
//!
//! # Core Types
//!
//! - [`Key`] - One step of descent
//! - [`Path`] - An unsized borrowed path type (always behind a reference)
//! - [`PathBuf`] - An owned path type that can be constructed and modified
//!
//! # Usage
//!
//! ```rust
//! use arbor::path::{Key, PathBuf};
//! use std::str::FromStr;
//!
//! // Parse the dotted form
//! let parsed = PathBuf::from_str("children.1.name")?;
//!
//! // Build incrementally (infallible)
//! let built = PathBuf::new().push("children").push(1_usize).push("name");
//! assert_eq!(parsed, built);
//! assert_eq!(built.last(), Some(&Key::from("name")));
//! # Ok::<(), arbor::path::PathError>(())
//! ```

use std::{
    borrow::{Borrow, Cow},
    fmt::{self, Write as _},
    ops::Deref,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for textual path parsing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A component starting with a digit did not parse as an index, or a
    /// quoted name was left open.
    #[error("Invalid component '{component}': {reason}")]
    InvalidComponent { component: String, reason: String },
}

/// One step of descent into a container.
///
/// Keys are only meaningful relative to the container they were taken from:
/// an `Index` addresses an ordered sequence, a `Name` addresses a keyed
/// mapping or the field space of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Position in an ordered sequence
    Index(usize),
    /// Entry name in a mapping, or a node field name
    Name(Cow<'static, str>),
}

impl Key {
    /// Creates a name key borrowing a static string, used for node field names.
    pub const fn field(name: &'static str) -> Self {
        Key::Name(Cow::Borrowed(name))
    }

    /// Returns the index if this is an `Index` key
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            Key::Name(_) => None,
        }
    }

    /// Returns the name if this is a `Name` key
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Index(_) => None,
            Key::Name(name) => Some(name),
        }
    }

    /// Returns true if this key addresses an ordered sequence
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }
}

/// Names that would not parse back as the same key are written in double
/// quotes, with `"` and `\` escaped.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) if needs_quotes(name) => {
                f.write_char('"')?;
                for c in name.chars() {
                    if matches!(c, '"' | '\\') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('"')
            }
            Key::Name(name) => write!(f, "{name}"),
        }
    }
}

fn needs_quotes(name: &str) -> bool {
    name.is_empty()
        || name.contains('.')
        || name.starts_with(|c: char| c.is_ascii_digit() || c == '"')
}

/// Reads a quoted name back, returning `None` unless the closing quote ends
/// the component.
fn unquote(component: &str) -> Option<String> {
    let mut chars = component.strip_prefix('"')?.chars();
    let mut name = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => name.push(chars.next()?),
            '"' => return chars.as_str().is_empty().then_some(name),
            c => name.push(c),
        }
    }
    None
}

/// Splits at every dot outside a quoted name.
fn split_components(s: &str) -> Vec<&str> {
    let mut components = Vec::new();
    let (mut start, mut quoted, mut escaped) = (0, false, false);
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '"' if i == start => quoted = true,
            '"' if quoted => quoted = false,
            '\\' if quoted => escaped = true,
            '.' if !quoted => {
                components.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    components.push(&s[start..]);
    components
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(Cow::Owned(name.to_string()))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Cow::Owned(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl PartialEq<usize> for Key {
    fn eq(&self, other: &usize) -> bool {
        self.as_index() == Some(*other)
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.as_name() == Some(*other)
    }
}

impl FromStr for Key {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('"') {
            return unquote(s)
                .map(Key::from)
                .ok_or_else(|| PathError::InvalidComponent {
                    component: s.to_string(),
                    reason: "quoted names must end at their closing quote".to_string(),
                });
        }
        if s.starts_with(|c: char| c.is_ascii_digit()) {
            return s
                .parse::<usize>()
                .map(Key::Index)
                .map_err(|err| PathError::InvalidComponent {
                    component: s.to_string(),
                    reason: format!("components starting with a digit must be indices ({err})"),
                });
        }
        Ok(Key::from(s))
    }
}

/// An owned path: a root-relative or parent-relative sequence of keys.
///
/// Cloning a `PathBuf` copies its keys; two paths never alias.
///
/// # Examples
///
/// ```rust
/// # use arbor::path::PathBuf;
/// let path = PathBuf::new().push("elements").push(0_usize).push(2_usize);
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "elements.0.2");
/// assert_eq!(path.parent().map(|p| p.to_string()), Some("elements.0".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathBuf {
    keys: Vec<Key>,
}

/// A borrowed path, the counterpart to [`PathBuf`] the way `[T]` relates to
/// `Vec<T>`.
///
/// This type is unsized and must always be used behind a reference.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    keys: [Key],
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Creates a path from a list of keys.
    pub fn from_keys(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// Adds a key to the end of this path.
    pub fn push(mut self, key: impl Into<Key>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Adds a key to the end of this path in place.
    pub fn push_key(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    /// Removes and returns the last key.
    pub fn pop(&mut self) -> Option<Key> {
        self.keys.pop()
    }

    /// Joins this path with another path.
    pub fn join(mut self, other: impl AsRef<Path>) -> Self {
        self.keys.extend_from_slice(&other.as_ref().keys);
        self
    }

    /// Returns mutable access to the keys, for in-place renumbering.
    pub fn keys_mut(&mut self) -> &mut [Key] {
        &mut self.keys
    }

    /// Consumes the path, returning its keys.
    pub fn into_keys(self) -> Vec<Key> {
        self.keys
    }
}

impl Path {
    /// Views a slice of keys as a path.
    pub fn from_keys(keys: &[Key]) -> &Path {
        // SAFETY: Path is repr(transparent) over [Key]
        unsafe { &*(keys as *const [Key] as *const Path) }
    }

    /// The empty path, addressing the root itself.
    pub fn root() -> &'static Path {
        Path::from_keys(&[])
    }

    /// Returns the keys of this path.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns an iterator over the keys.
    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.keys.iter()
    }

    /// Returns the number of keys in the path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the path has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the first key, or `None` if empty.
    pub fn first(&self) -> Option<&Key> {
        self.keys.first()
    }

    /// Returns the last key, or `None` if empty.
    pub fn last(&self) -> Option<&Key> {
        self.keys.last()
    }

    /// Returns the parent path, or `None` if this is the root.
    pub fn parent(&self) -> Option<&Path> {
        self.split_last().map(|(_, parent)| parent)
    }

    /// Splits off the last key, returning it with the remaining prefix.
    pub fn split_last(&self) -> Option<(&Key, &Path)> {
        self.keys
            .split_last()
            .map(|(last, rest)| (last, Path::from_keys(rest)))
    }

    /// Returns the first `len` keys as a path.
    ///
    /// # Panics
    /// Panics if `len` exceeds the path length.
    pub fn prefix(&self, len: usize) -> &Path {
        Path::from_keys(&self.keys[..len])
    }

    /// Returns true if `prefix` is a prefix of this path.
    pub fn starts_with(&self, prefix: impl AsRef<Path>) -> bool {
        self.keys.starts_with(&prefix.as_ref().keys)
    }

    /// Returns a new path with `key` appended.
    pub fn join_key(&self, key: impl Into<Key>) -> PathBuf {
        self.to_path_buf().push(key)
    }

    /// Converts this `Path` to an owned `PathBuf`.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            keys: self.keys.to_vec(),
        }
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        Path::from_keys(&self.keys)
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

/// A single key is shorthand for a one-element path.
impl AsRef<Path> for Key {
    fn as_ref(&self) -> &Path {
        Path::from_keys(std::slice::from_ref(self))
    }
}

impl AsRef<Path> for [Key] {
    fn as_ref(&self) -> &Path {
        Path::from_keys(self)
    }
}

impl AsRef<Path> for Vec<Key> {
    fn as_ref(&self) -> &Path {
        Path::from_keys(self)
    }
}

impl<const N: usize> AsRef<Path> for [Key; N] {
    fn as_ref(&self) -> &Path {
        Path::from_keys(self)
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self
    }
}

impl ToOwned for Path {
    type Owned = PathBuf;

    fn to_owned(&self) -> PathBuf {
        self.to_path_buf()
    }
}

impl From<&Path> for PathBuf {
    fn from(path: &Path) -> Self {
        path.to_path_buf()
    }
}

impl From<Vec<Key>> for PathBuf {
    fn from(keys: Vec<Key>) -> Self {
        PathBuf { keys }
    }
}

impl From<Key> for PathBuf {
    fn from(key: Key) -> Self {
        PathBuf { keys: vec![key] }
    }
}

impl FromIterator<Key> for PathBuf {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        PathBuf {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl<'a> IntoIterator for &'a PathBuf {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl PartialEq<Path> for PathBuf {
    fn eq(&self, other: &Path) -> bool {
        self.keys == other.keys
    }
}

impl PartialEq<PathBuf> for Path {
    fn eq(&self, other: &PathBuf) -> bool {
        self.keys == other.keys
    }
}

impl PartialEq<&Path> for PathBuf {
    fn eq(&self, other: &&Path) -> bool {
        self.keys == other.keys
    }
}

/// Parses the dotted form written by `Display`.
///
/// Empty components are dropped, so `""` and `"..."` both parse to the empty
/// path. A quoted component is always a name: `"2024"` and `"a.b"` are single
/// keys.
impl FromStr for PathBuf {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_components(s)
            .into_iter()
            .filter(|component| !component.is_empty())
            .map(Key::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(PathBuf::from_keys)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return write!(f, "(empty path)");
        }
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.deref(), f)
    }
}

/// Constructs a [`PathBuf`] from a list of keys.
///
/// Each argument is converted with `Into<Key>`: integers become indices,
/// strings become names.
///
/// # Examples
///
/// ```rust
/// # use arbor::path;
/// # use arbor::path::Key;
/// let path = path!["children", 1_usize, "children", 0_usize];
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.keys()[1], Key::Index(1));
///
/// let empty = path![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::path::PathBuf::new()
    };

    ($($key:expr),+ $(,)?) => {{
        let mut path = $crate::path::PathBuf::new();
        $(
            path.push_key($key);
        )+
        path
    }};
}
