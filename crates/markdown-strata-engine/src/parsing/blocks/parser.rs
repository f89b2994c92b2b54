use std::fmt;

use crate::parsing::inline::InlineParser;

use super::{
    content::BlockLine,
    state::ParserState,
    types::{BlockKind, NodeId},
};

/// Outcome of asking an open block whether the current line continues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContinue {
    /// The block does not continue; it and every block below it are unmatched.
    None,
    /// The block continues at the current position.
    Matched,
    /// The block continues, content resumes at this byte index.
    AtIndex(usize),
    /// The block continues, content resumes at this column.
    AtColumn(usize),
    /// The block is complete with this line; close it and stop processing the line.
    Finalize,
}

/// Stateful recognizer owning one block, open or already closed.
///
/// Default methods describe a leaf block that takes no lines and never
/// breaks out of lists.
pub trait BlockParser: fmt::Debug {
    /// The block this parser owns.
    fn block(&self) -> NodeId;

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue;

    /// Receives the rest of the current line. Only called while this parser is the tip.
    fn add_line(&mut self, _state: &mut ParserState, _line: BlockLine) {}

    /// Block-specific cleanup once the block stops receiving lines.
    fn close_block(&mut self, _state: &mut ParserState) {}

    /// Drops transient parse state after `close_block`.
    fn finalize_closed_block(&mut self) {}

    fn can_contain(&self, _candidate: BlockKind) -> bool {
        false
    }

    fn is_container(&self) -> bool {
        false
    }

    fn is_paragraph_parser(&self) -> bool {
        false
    }

    fn break_out_on_double_blank_line(&self) -> bool {
        false
    }

    /// Whether a blank line incorporated into this block marks it (and its
    /// ancestors) as ending in a blank line. `opened_this_line` is true when
    /// the block started on the current line.
    fn counts_blank_lines(&self, _state: &ParserState, _opened_this_line: bool) -> bool {
        true
    }

    /// Hands the finished literal content of the block to the inline parser.
    fn parse_inlines(&self, _state: &ParserState, _inline: &mut dyn InlineParser) {}
}
