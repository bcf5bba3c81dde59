//! Input contexts and virtual paths.
//!
//! An [`InputContext`] is an immutable handle over a source string: a shared
//! buffer, a byte offset into it, and the [`VirtualPath`] the text came from.
//! Advancing never mutates the context in place — it returns a new one,
//! cheaply, because the underlying buffer is reference-counted.

use std::fmt;
use std::rc::Rc;

/// A path within the logical document tree, decoupled from the filesystem.
///
/// Always stored and compared in normalized form: `/`-separated, no trailing
/// slash (except the root, which is just `/`), no `.` segments, `..` resolved
/// away where possible.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VirtualPath(Rc<str>);

impl VirtualPath {
    /// The root of a document tree.
    pub fn root() -> Self {
        VirtualPath(Rc::from("/"))
    }

    /// Parse a path string, normalizing it. Relative paths are kept relative.
    pub fn parse(raw: &str) -> Self {
        let absolute = raw.starts_with('/');
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        let joined = segments.join("/");
        let rendered = if absolute {
            format!("/{joined}")
        } else {
            joined
        };
        VirtualPath(Rc::from(rendered.as_str()))
    }

    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment, if any (e.g. `"intro"` for `/chapters/intro`).
    pub fn name(&self) -> Option<&str> {
        self.0.rsplit('/').find(|s| !s.is_empty())
    }

    /// The parent path, if this one is not already the root.
    pub fn parent(&self) -> Option<VirtualPath> {
        if self.0.as_ref() == "/" || self.0.is_empty() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(VirtualPath::root()),
            Some(idx) => Some(VirtualPath::parse(&self.0[..idx])),
            None => None,
        }
    }

    /// Resolve `relative` against this path, as the containing directory.
    pub fn join(&self, relative: &str) -> VirtualPath {
        if relative.starts_with('/') {
            return VirtualPath::parse(relative);
        }
        let base = if self.is_absolute() {
            self.parent().unwrap_or_else(VirtualPath::root)
        } else {
            self.clone()
        };
        let combined = format!("{}/{}", base.0.trim_end_matches('/'), relative);
        VirtualPath::parse(&combined)
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtualPath({:?})", self.0.as_ref())
    }
}

impl From<&str> for VirtualPath {
    fn from(raw: &str) -> Self {
        VirtualPath::parse(raw)
    }
}

/// An immutable handle over a source string: the shared buffer, the current
/// byte offset into it, the origin path, and the current recursion nesting
/// level (used by recursive block/span handles to bound pathological input).
///
/// Invariant: `offset <= source.len()`, and `offset` always falls on a UTF-8
/// character boundary.
#[derive(Clone)]
pub struct InputContext {
    source: Rc<str>,
    offset: usize,
    path: VirtualPath,
    nest_level: u16,
}

impl InputContext {
    pub fn new(source: impl Into<Rc<str>>, path: VirtualPath) -> Self {
        InputContext {
            source: source.into(),
            offset: 0,
            path,
            nest_level: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn path(&self) -> &VirtualPath {
        &self.path
    }

    pub fn nest_level(&self) -> u16 {
        self.nest_level
    }

    /// The full source buffer this context was built over.
    pub fn full_source(&self) -> &str {
        &self.source
    }

    /// The unconsumed remainder of the buffer.
    pub fn remaining(&self) -> &str {
        &self.source[self.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// A context advanced by `byte_len` bytes, which must land on a char
    /// boundary (the combinators in `text` only ever advance by whole chars
    /// or validated literals, so this never panics in practice).
    pub fn advance_bytes(&self, byte_len: usize) -> InputContext {
        let offset = self.offset + byte_len;
        debug_assert!(offset <= self.source.len());
        debug_assert!(self.source.is_char_boundary(offset));
        InputContext {
            source: self.source.clone(),
            offset,
            path: self.path.clone(),
            nest_level: self.nest_level,
        }
    }

    /// A context advanced past the next character, or `None` at end of input.
    pub fn advance_char(&self) -> Option<InputContext> {
        let ch = self.peek_char()?;
        Some(self.advance_bytes(ch.len_utf8()))
    }

    /// A context at an absolute byte offset into the same buffer.
    pub fn with_offset(&self, offset: usize) -> InputContext {
        debug_assert!(offset <= self.source.len());
        InputContext {
            source: self.source.clone(),
            offset,
            path: self.path.clone(),
            nest_level: self.nest_level,
        }
    }

    /// A context for recursive descent into child content, one nesting level
    /// deeper, rooted at `offset` within the same buffer and path.
    pub fn nested_at(&self, offset: usize) -> InputContext {
        InputContext {
            source: self.source.clone(),
            offset,
            path: self.path.clone(),
            nest_level: self.nest_level + 1,
        }
    }

    /// The exact slice between two byte offsets of this context's buffer.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    /// Line/column position (1-based) for a byte offset into this context's
    /// buffer. Not on the parsing hot path; used for error reporting.
    pub fn locate(&self, offset: usize) -> Position {
        locate_in(&self.source, offset)
    }
}

impl fmt::Debug for InputContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputContext")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("nest_level", &self.nest_level)
            .finish()
    }
}

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

fn locate_in(source: &str, offset: usize) -> Position {
    let offset = offset.min(source.len());
    let mut line: u32 = 1;
    let mut last_newline = 0usize;
    for (idx, ch) in source[..offset].char_indices() {
        if ch == '\n' {
            line += 1;
            last_newline = idx + 1;
        }
    }
    let column = source[last_newline..offset].chars().count() as u32 + 1;
    Position::new(line, column)
}

/// A concrete carrier for "this text, at this place" error context: the
/// source fragment consumed by a construct, with enough information to
/// render a `path:line:col` diagnostic and to show the original text back to
/// the user (e.g. inside an `InvalidBlock`/`InvalidSpan` node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFragment {
    pub path: VirtualPath,
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl fmt::Display for SourceFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.path, self.start, self.end)
    }
}
