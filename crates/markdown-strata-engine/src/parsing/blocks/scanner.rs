//! Position tracking within the line currently being incorporated.
//!
//! Indices are byte offsets into the line (EOL excluded). Columns expand tabs
//! to the next multiple of [`TAB_STOP`]. When a column seek lands inside a
//! tab the scanner remembers it, and [`LineScanner::rest`] materializes the
//! tab's remaining columns as spaces.

use crate::parsing::rope::{LineRef, Span};

use super::content::BlockLine;

/// Tabs advance to the next multiple of this column.
pub const TAB_STOP: usize = 4;

/// Indent at which a line becomes indented code.
pub const CODE_BLOCK_INDENT: usize = 4;

/// Columns from `column` to the next tab stop.
pub fn columns_to_next_tab_stop(column: usize) -> usize {
    TAB_STOP - (column % TAB_STOP)
}

pub fn is_space_or_tab(b: Option<&u8>) -> bool {
    matches!(b, Some(b' ' | b'\t'))
}

#[derive(Debug, Default)]
pub struct LineScanner {
    line: LineRef,
    index: usize,
    column: usize,
    column_is_in_tab: bool,
    next_non_space: usize,
    next_non_space_column: usize,
    indent: usize,
    blank: bool,
}

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts scanning `line` from its first byte.
    pub fn reset(&mut self, line: LineRef) {
        self.line = line;
        self.index = 0;
        self.column = 0;
        self.column_is_in_tab = false;
        self.next_non_space = 0;
        self.next_non_space_column = 0;
        self.indent = 0;
        self.blank = false;
    }

    pub fn line_ref(&self) -> &LineRef {
        &self.line
    }

    /// Line text without the EOL marker.
    pub fn line(&self) -> &str {
        self.line.content()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn column_is_in_tab(&self) -> bool {
        self.column_is_in_tab
    }

    pub fn next_non_space_index(&self) -> usize {
        self.next_non_space
    }

    pub fn next_non_space_column(&self) -> usize {
        self.next_non_space_column
    }

    /// Columns between the current position and the next non-space character.
    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn is_indented(&self) -> bool {
        self.indent >= CODE_BLOCK_INDENT
    }

    /// True if nothing but spaces and tabs remain from the current position.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Locates the next character that is neither space nor tab, updating
    /// the blank flag and the indent relative to the current column.
    pub fn find_next_non_space(&mut self) {
        let bytes = self.line.content().as_bytes();
        let mut i = self.index;
        let mut cols = self.column;

        self.blank = true;
        while let Some(&b) = bytes.get(i) {
            match b {
                b' ' => {
                    i += 1;
                    cols += 1;
                }
                b'\t' => {
                    i += 1;
                    cols += columns_to_next_tab_stop(cols);
                }
                _ => {
                    self.blank = false;
                    break;
                }
            }
        }

        self.next_non_space = i;
        self.next_non_space_column = cols;
        self.indent = cols - self.column;
    }

    /// Advances over one character.
    pub fn advance(&mut self) {
        let Some(c) = self.line()[self.index..].chars().next() else {
            return;
        };
        if c == '\t' {
            self.column += columns_to_next_tab_stop(self.column);
        } else {
            self.column += 1;
        }
        self.index += c.len_utf8();
    }

    /// Moves to byte `new_index`; an index seek never ends inside a tab.
    pub fn set_new_index(&mut self, new_index: usize) {
        if new_index >= self.next_non_space {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        let len = self.line().len();
        while self.index < new_index && self.index != len {
            self.advance();
        }
        self.column_is_in_tab = false;
    }

    /// Moves to column `new_column`. If that column falls inside a tab the
    /// position stays on the tab, the column is set to `new_column` and the
    /// in-tab flag is raised.
    pub fn set_new_column(&mut self, new_column: usize) {
        if new_column >= self.next_non_space_column {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        let len = self.line().len();
        while self.column < new_column && self.index != len {
            self.advance();
        }
        if self.column > new_column {
            // overshot: the last character was a tab
            self.index -= 1;
            self.column = new_column;
            self.column_is_in_tab = true;
        } else {
            self.column_is_in_tab = false;
        }
    }

    /// The remainder of the line from the current position, EOL included.
    pub fn rest(&self) -> BlockLine {
        let full = self.line.full_span();
        let start = full.start + self.index;
        if self.column_is_in_tab {
            BlockLine {
                span: Span::new(start + 1, full.end),
                leading_spaces: columns_to_next_tab_stop(self.column),
            }
        } else {
            BlockLine::new(Span::new(start, full.end))
        }
    }
}
