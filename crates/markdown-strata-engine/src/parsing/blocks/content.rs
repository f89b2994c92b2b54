//! Literal content accumulated by leaf blocks.
//!
//! A block's content is a list of source line spans rather than copied text.
//! The one exception is a partially consumed tab at the start of a line: its
//! remaining columns are materialized as `leading_spaces` in front of the span.

use serde::Serialize;
use xi_rope::Rope;

use crate::parsing::rope::{Span, slice::slice_to_string};

/// One line of block content.
///
/// # Invariants
///
/// - `span` covers the text after container prefixes, including the EOL marker
/// - `leading_spaces` is only non-zero when the line started inside a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockLine {
    /// Source span of the content, EOL included.
    pub span: Span,
    /// Spaces that stand in front of `span` (remaining columns of a split tab).
    pub leading_spaces: usize,
}

impl BlockLine {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            leading_spaces: 0,
        }
    }

    /// Length in bytes of the materialized line.
    pub fn len(&self) -> usize {
        self.leading_spaces + self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materializes the line, EOL included.
    pub fn text(&self, rope: &Rope) -> String {
        let mut s = " ".repeat(self.leading_spaces);
        s.push_str(&slice_to_string(rope, self.span));
        s
    }

    /// Drops the first `n` bytes of the materialized line.
    pub fn advance(&mut self, n: usize) {
        if n <= self.leading_spaces {
            self.leading_spaces -= n;
        } else {
            self.span = self.span.skip(n - self.leading_spaces);
            self.leading_spaces = 0;
        }
    }
}

/// The ordered content lines of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockContent {
    lines: Vec<BlockLine>,
}

impl BlockContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<BlockLine>) -> Self {
        Self { lines }
    }

    pub fn push(&mut self, line: BlockLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[BlockLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total materialized length in bytes.
    pub fn len(&self) -> usize {
        self.lines.iter().map(BlockLine::len).sum()
    }

    /// Concatenates all lines, EOL markers included.
    pub fn text(&self, rope: &Rope) -> String {
        self.lines.iter().map(|l| l.text(rope)).collect()
    }

    /// Each line without its EOL marker.
    pub fn line_texts(&self, rope: &Rope) -> Vec<String> {
        self.lines
            .iter()
            .map(|l| l.text(rope).trim_end_matches(['\r', '\n']).to_string())
            .collect()
    }

    /// Removes the first `offset` bytes of the concatenated text.
    ///
    /// Fully consumed lines are dropped and the first surviving line's start
    /// moves forward by whatever remains of `offset`.
    pub fn skip_prefix(&mut self, mut offset: usize) {
        let mut consumed = 0;
        for line in &self.lines {
            if offset < line.len() {
                break;
            }
            offset -= line.len();
            consumed += 1;
        }
        self.lines.drain(..consumed);
        if offset > 0
            && let Some(first) = self.lines.first_mut()
        {
            first.advance(offset);
        }
    }

    /// Drops trailing lines that contain only whitespace.
    pub fn trim_trailing_blank_lines(&mut self, rope: &Rope) {
        while let Some(last) = self.lines.last() {
            if !last.text(rope).trim().is_empty() {
                break;
            }
            self.lines.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn content(ranges: &[(usize, usize)]) -> BlockContent {
        BlockContent::from_lines(
            ranges
                .iter()
                .map(|&(s, e)| BlockLine::new(Span::new(s, e)))
                .collect(),
        )
    }

    #[test]
    fn leading_spaces_are_materialized() {
        let rope = Rope::from("\tfoo\n");
        let line = BlockLine {
            span: Span::new(1, 5),
            leading_spaces: 2,
        };
        assert_eq!(line.text(&rope), "  foo\n");
        assert_eq!(line.len(), 6);
    }

    #[test]
    fn advance_consumes_leading_spaces_first() {
        let mut line = BlockLine {
            span: Span::new(1, 5),
            leading_spaces: 2,
        };
        line.advance(1);
        assert_eq!((line.leading_spaces, line.span), (1, Span::new(1, 5)));
        line.advance(3);
        assert_eq!((line.leading_spaces, line.span), (0, Span::new(3, 5)));
    }

    #[test]
    fn skip_prefix_drops_whole_lines() {
        let rope = Rope::from("ab\ncd\nef\n");
        let mut c = content(&[(0, 3), (3, 6), (6, 9)]);
        c.skip_prefix(3);
        assert_eq!(c.line_texts(&rope), vec!["cd", "ef"]);
    }

    #[test]
    fn skip_prefix_shortens_first_surviving_line() {
        let rope = Rope::from("ab\ncd\nef\n");
        let mut c = content(&[(0, 3), (3, 6), (6, 9)]);
        c.skip_prefix(4);
        assert_eq!(c.line_texts(&rope), vec!["d", "ef"]);
        assert_eq!(c.lines()[0].span.start, 4);
    }

    #[test]
    fn trailing_blank_lines_are_trimmed() {
        let rope = Rope::from("a\n\n  \n");
        let mut c = content(&[(0, 2), (2, 3), (3, 6)]);
        c.trim_trailing_blank_lines(&rope);
        assert_eq!(c.line_texts(&rope), vec!["a"]);
    }
}
