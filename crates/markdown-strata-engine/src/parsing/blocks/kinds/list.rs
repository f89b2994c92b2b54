//! Bullet and ordered lists.
//!
//! A list block groups consecutive items whose markers agree (see
//! [`ListMarker::same_list`]). Item content starts at the column after the
//! marker plus its padding; continuation lines must be indented at least
//! that far.

use crate::parsing::blocks::{
    open::{BlockParserFactory, BlockStart, MatchedBlockParser},
    parser::{BlockContinue, BlockParser},
    scanner::{columns_to_next_tab_stop, is_space_or_tab},
    state::ParserState,
    types::{BlockAttrs, BlockKind, ListMarker, NodeId},
};

/// Ordered list numbers have at most nine digits.
pub const MAX_ORDERED_DIGITS: usize = 9;

/// Spaces after a marker beyond this mean the content is indented code.
const MAX_MARKER_PADDING: usize = 4;

/// Recognizes a list marker at the start of `rest`. Returns the marker and
/// its length in bytes.
pub fn parse_marker(rest: &str) -> Option<(ListMarker, usize)> {
    let bytes = rest.as_bytes();
    match *bytes.first()? {
        b @ (b'-' | b'+' | b'*') => Some((ListMarker::Bullet(b as char), 1)),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > MAX_ORDERED_DIGITS {
                return None;
            }
            let delimiter = match bytes.get(digits)? {
                b'.' => '.',
                b')' => ')',
                _ => return None,
            };
            let start = rest[..digits].parse().ok()?;
            Some((ListMarker::Ordered { start, delimiter }, digits + 1))
        }
        _ => None,
    }
}

/// True if the last line of `block`, or of its last descendant list or
/// item, was blank.
fn ends_with_blank_line(state: &ParserState, block: NodeId) -> bool {
    let mut node = Some(block);
    while let Some(block) = node {
        if state.is_last_line_blank(block) {
            return true;
        }
        node = match state.tree().kind(block) {
            BlockKind::ListBlock | BlockKind::ListItem => state.tree().last_child(block),
            _ => None,
        };
    }
    false
}

/// Container of list items. Tightness is decided when it closes.
#[derive(Debug)]
pub struct ListBlockParser {
    block: NodeId,
}

impl ListBlockParser {
    /// A list is loose if any item but the last ends with a blank line, or
    /// if a blank line separates two direct children of one item.
    fn is_tight(&self, state: &ParserState) -> bool {
        let tree = state.tree();
        let items = tree.children(self.block);
        for (i, &item) in items.iter().enumerate() {
            let last_item = i + 1 == items.len();
            if ends_with_blank_line(state, item) && !last_item {
                return false;
            }
            let children = tree.children(item);
            for (j, &child) in children.iter().enumerate() {
                let last_child = j + 1 == children.len();
                if ends_with_blank_line(state, child) && !(last_item && last_child) {
                    return false;
                }
            }
        }
        true
    }
}

impl BlockParser for ListBlockParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, _state: &ParserState) -> BlockContinue {
        // items decide; a line that fits no item closes the list through them
        BlockContinue::Matched
    }

    fn close_block(&mut self, state: &mut ParserState) {
        let tight = self.is_tight(state);
        if let BlockAttrs::List { tight: t, .. } = &mut state.tree_mut().get_mut(self.block).attrs {
            *t = tight;
        }
    }

    fn can_contain(&self, candidate: BlockKind) -> bool {
        candidate == BlockKind::ListItem
    }

    fn is_container(&self) -> bool {
        true
    }

    fn break_out_on_double_blank_line(&self) -> bool {
        true
    }
}

#[derive(Debug)]
pub struct ListItemParser {
    block: NodeId,
    marker_offset: usize,
    padding: usize,
}

impl BlockParser for ListItemParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        if state.is_blank() {
            if state.tree().first_child(self.block).is_none() {
                // an item can begin with at most one blank line
                BlockContinue::None
            } else {
                BlockContinue::AtIndex(state.next_non_space_index())
            }
        } else if state.indent() >= self.marker_offset + self.padding {
            BlockContinue::AtColumn(state.column() + self.marker_offset + self.padding)
        } else {
            BlockContinue::None
        }
    }

    fn can_contain(&self, candidate: BlockKind) -> bool {
        candidate != BlockKind::ListItem
    }

    fn is_container(&self) -> bool {
        true
    }

    fn break_out_on_double_blank_line(&self) -> bool {
        true
    }

    fn counts_blank_lines(&self, state: &ParserState, opened_this_line: bool) -> bool {
        !(opened_this_line && state.tree().first_child(self.block).is_none())
    }
}

#[derive(Debug, Default)]
pub struct ListFactory;

impl BlockParserFactory for ListFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        if state.is_indented() {
            return None;
        }
        let line = state.line();
        let bytes = line.as_bytes();
        let next_non_space = state.next_non_space_index();
        let (marker, marker_len) = parse_marker(&line[next_non_space..])?;
        let after_marker = next_non_space + marker_len;

        if bytes.get(after_marker).is_some() && !is_space_or_tab(bytes.get(after_marker)) {
            return None;
        }

        if matched.is_paragraph_parser() {
            // interrupting a paragraph needs content and, if ordered, a list starting at 1
            if line[after_marker..].trim_matches([' ', '\t']).is_empty() {
                return None;
            }
            if matches!(marker, ListMarker::Ordered { start, .. } if start != 1) {
                return None;
            }
        }

        let marker_column = state.next_non_space_column() + marker_len;
        let mut column = marker_column;
        let mut index = after_marker;
        while let Some(&b) = bytes.get(index) {
            match b {
                b' ' => column += 1,
                b'\t' => column += columns_to_next_tab_stop(column),
                _ => break,
            }
            index += 1;
        }
        let spaces_after_marker = column - marker_column;
        let rest_is_blank = index == bytes.len();

        let (padding, content_column) =
            if spaces_after_marker > MAX_MARKER_PADDING || spaces_after_marker == 0 || rest_is_blank
            {
                // content is indented code or absent; it starts one column after the marker
                let column = marker_column + usize::from(is_space_or_tab(bytes.get(after_marker)));
                (marker_len + 1, column)
            } else {
                (
                    marker_len + spaces_after_marker,
                    marker_column + spaces_after_marker,
                )
            };
        let marker_offset = state.indent();

        let continues_list = matched.kind() == BlockKind::ListBlock
            && matches!(
                state.tree().get(matched.block()).attrs,
                BlockAttrs::List { marker: current, .. } if current.same_list(marker)
            );

        let mut parsers: Vec<Box<dyn BlockParser>> = Vec::with_capacity(2);
        if !continues_list {
            let list = state.new_block(
                BlockKind::ListBlock,
                BlockAttrs::List {
                    marker,
                    tight: true,
                },
            );
            parsers.push(Box::new(ListBlockParser { block: list }));
        }
        let item = state.new_block(
            BlockKind::ListItem,
            BlockAttrs::ListItem {
                marker,
                marker_offset,
                padding,
            },
        );
        parsers.push(Box::new(ListItemParser {
            block: item,
            marker_offset,
            padding,
        }));

        Some(BlockStart::of_all(parsers).at_column(content_column))
    }
}
