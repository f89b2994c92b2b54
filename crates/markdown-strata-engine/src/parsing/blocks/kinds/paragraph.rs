use crate::parsing::{
    blocks::{
        content::BlockLine,
        parser::{BlockContinue, BlockParser},
        state::ParserState,
        types::{BlockKind, NodeId},
    },
    inline::InlineParser,
};

/// The fallback leaf: any non-blank line no factory claims.
///
/// Paragraph content keeps every line, leading whitespace already skipped.
/// Reference definitions at its start are consumed later by the
/// paragraph pre-processors.
#[derive(Debug)]
pub struct ParagraphParser {
    block: NodeId,
}

impl ParagraphParser {
    pub fn new(block: NodeId) -> Self {
        Self { block }
    }
}

impl BlockParser for ParagraphParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        if state.is_blank() {
            BlockContinue::None
        } else {
            BlockContinue::Matched
        }
    }

    fn add_line(&mut self, state: &mut ParserState, line: BlockLine) {
        state.tree_mut().get_mut(self.block).content.push(line);
    }

    fn is_paragraph_parser(&self) -> bool {
        true
    }

    fn parse_inlines(&self, state: &ParserState, inline: &mut dyn InlineParser) {
        let text = state.block_text(self.block);
        inline.parse_block(
            self.block,
            BlockKind::Paragraph,
            text.trim_end(),
            state.properties(),
        );
    }
}
