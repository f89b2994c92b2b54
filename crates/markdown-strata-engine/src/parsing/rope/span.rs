use serde::Serialize;

/// A byte range `[start, end)` into the source rope.
///
/// Block content never copies source text; it records spans so that slicing
/// the rope with any span reproduces the exact input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// The span with its first `n` bytes removed, clamped to the end.
    #[must_use]
    pub fn skip(self, n: usize) -> Self {
        Self {
            start: (self.start + n).min(self.end),
            end: self.end,
        }
    }
}
