use crate::parsing::blocks::{
    open::{BlockParserFactory, BlockStart, MatchedBlockParser},
    parser::{BlockContinue, BlockParser},
    scanner::is_space_or_tab,
    state::ParserState,
    types::{BlockAttrs, BlockKind, NodeId},
};

pub const MARKER: u8 = b'>';

/// `>` followed by an optional space or tab. Container for any block.
#[derive(Debug)]
pub struct BlockQuoteParser {
    block: NodeId,
}

impl BlockQuoteParser {
    pub fn new(block: NodeId) -> Self {
        Self { block }
    }
}

/// Column right after the marker and its optional following space, if the
/// current line has a marker at its next non-space position.
fn content_column(state: &ParserState) -> Option<usize> {
    let next_non_space = state.next_non_space_index();
    let bytes = state.line().as_bytes();
    if state.is_indented() || bytes.get(next_non_space) != Some(&MARKER) {
        return None;
    }
    let mut column = state.next_non_space_column() + 1;
    if is_space_or_tab(bytes.get(next_non_space + 1)) {
        column += 1;
    }
    Some(column)
}

impl BlockParser for BlockQuoteParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        content_column(state).map_or(BlockContinue::None, BlockContinue::AtColumn)
    }

    fn can_contain(&self, _candidate: BlockKind) -> bool {
        true
    }

    fn is_container(&self) -> bool {
        true
    }

    fn counts_blank_lines(&self, _state: &ParserState, _opened_this_line: bool) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct BlockQuoteFactory;

impl BlockParserFactory for BlockQuoteFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        _matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        let column = content_column(state)?;
        let block = state.new_block(BlockKind::BlockQuote, BlockAttrs::None);
        Some(BlockStart::of(Box::new(BlockQuoteParser::new(block))).at_column(column))
    }
}
