use crate::parsing::blocks::{
    open::{BlockParserFactory, BlockStart, MatchedBlockParser},
    parser::{BlockContinue, BlockParser},
    state::ParserState,
    types::{BlockAttrs, BlockKind, NodeId},
};

/// Three or more of the same `*`, `-` or `_`, optionally separated by spaces or tabs.
pub fn is_thematic_break(rest: &str) -> bool {
    let mut marker = None;
    let mut count = 0;
    for b in rest.bytes() {
        match b {
            b'*' | b'-' | b'_' => {
                if *marker.get_or_insert(b) != b {
                    return false;
                }
                count += 1;
            }
            b' ' | b'\t' => {}
            _ => return false,
        }
    }
    count >= 3
}

/// Single-line leaf; never continues.
#[derive(Debug)]
pub struct ThematicBreakParser {
    block: NodeId,
}

impl BlockParser for ThematicBreakParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, _state: &ParserState) -> BlockContinue {
        BlockContinue::None
    }
}

#[derive(Debug, Default)]
pub struct ThematicBreakFactory;

impl BlockParserFactory for ThematicBreakFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        _matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        if state.is_indented() || !is_thematic_break(&state.line()[state.next_non_space_index()..])
        {
            return None;
        }
        let block = state.new_block(BlockKind::ThematicBreak, BlockAttrs::None);
        let end = state.line().len();
        Some(BlockStart::of(Box::new(ThematicBreakParser { block })).at_index(end))
    }
}
