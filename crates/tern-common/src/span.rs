//! Span - Source location tracking for AST nodes and diagnostics
//!
//! A `Span` is a byte range into one source file; a `Location` pairs a span
//! with the file it came from. Parsers produce locations, the AST carries
//! them in node metadata, and diagnostics point at them.
//!
//! Spans are small (8 bytes) and cheap to copy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A span of source code, represented as a byte range.
///
/// Spans use half-open intervals: `[start, end)`.
/// An empty span has `start == end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: u32,
    /// End byte offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create an empty span at the given position.
    #[inline]
    pub const fn at(pos: u32) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Create a dummy/invalid span (used for synthetic nodes).
    #[inline]
    pub const fn dummy() -> Self {
        Span {
            start: u32::MAX,
            end: u32::MAX,
        }
    }

    /// Check if this is a dummy/invalid span.
    #[inline]
    pub const fn is_dummy(&self) -> bool {
        self.start == u32::MAX && self.end == u32::MAX
    }

    /// Get the length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans to create a span covering both.
    #[inline]
    pub const fn merge(&self, other: Span) -> Span {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A source location: a span within a named source file.
///
/// The file name is reference-counted so locations can be copied freely onto
/// every node of a module without duplicating the path string.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the source file; empty for synthetic nodes.
    pub file: Arc<str>,
    /// Byte range within the file.
    pub span: Span,
}

impl Location {
    pub fn new(file: impl Into<Arc<str>>, span: Span) -> Self {
        Location {
            file: file.into(),
            span,
        }
    }

    /// A location naming a file but no particular range.
    pub fn file_only(file: impl Into<Arc<str>>) -> Self {
        Location {
            file: file.into(),
            span: Span::dummy(),
        }
    }

    /// True if this location points anywhere at all.
    pub fn is_set(&self) -> bool {
        !self.file.is_empty()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_set() {
            return write!(f, "<no location>");
        }

        if self.span.is_dummy() {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}", self.file, self.span)
        }
    }
}

#[cfg(test)]
#[path = "tests/span.rs"]
mod tests;
