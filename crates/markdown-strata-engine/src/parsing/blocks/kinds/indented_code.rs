use crate::parsing::blocks::{
    content::BlockLine,
    open::{BlockParserFactory, BlockStart, MatchedBlockParser},
    parser::{BlockContinue, BlockParser},
    scanner::CODE_BLOCK_INDENT,
    state::ParserState,
    types::{BlockAttrs, BlockKind, NodeId},
};

/// Lines indented by four or more columns. Blank lines continue the block;
/// trailing blank lines are dropped when it closes.
#[derive(Debug)]
pub struct IndentedCodeParser {
    block: NodeId,
}

impl BlockParser for IndentedCodeParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        if state.indent() >= CODE_BLOCK_INDENT {
            BlockContinue::AtColumn(state.column() + CODE_BLOCK_INDENT)
        } else if state.is_blank() {
            BlockContinue::AtIndex(state.next_non_space_index())
        } else {
            BlockContinue::None
        }
    }

    fn add_line(&mut self, state: &mut ParserState, line: BlockLine) {
        state.tree_mut().get_mut(self.block).content.push(line);
    }

    fn close_block(&mut self, state: &mut ParserState) {
        let source = state.source().clone();
        state
            .tree_mut()
            .get_mut(self.block)
            .content
            .trim_trailing_blank_lines(&source);
    }
}

#[derive(Debug, Default)]
pub struct IndentedCodeFactory;

impl BlockParserFactory for IndentedCodeFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        // indented code cannot interrupt a paragraph, lazy or not
        if !state.is_indented()
            || state.is_blank()
            || matched.is_paragraph_parser()
            || state.active_kind() == BlockKind::Paragraph
        {
            return None;
        }
        let block = state.new_block(BlockKind::IndentedCodeBlock, BlockAttrs::None);
        let column = state.column() + CODE_BLOCK_INDENT;
        Some(BlockStart::of(Box::new(IndentedCodeParser { block })).at_column(column))
    }
}
