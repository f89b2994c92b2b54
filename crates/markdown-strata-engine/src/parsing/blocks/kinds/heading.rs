//! ATX (`# Title`) and setext (`Title` underlined by `===` or `---`) headings.

use crate::parsing::{
    blocks::{
        content::{BlockContent, BlockLine},
        open::{BlockParserFactory, BlockStart, MatchedBlockParser},
        parser::{BlockContinue, BlockParser},
        scanner::is_space_or_tab,
        state::ParserState,
        types::{BlockAttrs, BlockKind, NodeId},
    },
    inline::InlineParser,
    rope::Span,
};

pub const MAX_LEVEL: usize = 6;

/// Parses an ATX heading starting at `start`. Returns the level and the
/// byte range of the title within `line`, opening and closing sequences
/// stripped.
pub fn parse_atx(line: &str, start: usize) -> Option<(u8, usize, usize)> {
    let bytes = line.as_bytes();
    let level = bytes[start..].iter().take_while(|&&b| b == b'#').count();
    if level == 0 || level > MAX_LEVEL {
        return None;
    }
    let mut begin = start + level;
    if bytes.get(begin).is_some() && !is_space_or_tab(bytes.get(begin)) {
        return None;
    }
    while is_space_or_tab(bytes.get(begin)) {
        begin += 1;
    }

    let mut end = bytes.len();
    while end > begin && is_space_or_tab(bytes.get(end - 1)) {
        end -= 1;
    }
    let mut closing = end;
    while closing > begin && bytes[closing - 1] == b'#' {
        closing -= 1;
    }
    if closing == begin {
        end = begin;
    } else if closing < end && is_space_or_tab(bytes.get(closing - 1)) {
        end = closing;
        while end > begin && is_space_or_tab(bytes.get(end - 1)) {
            end -= 1;
        }
    }

    Some((level as u8, begin, end))
}

/// Level of a setext underline: 1 for `=`, 2 for `-`, trailing spaces allowed.
pub fn setext_level(rest: &str) -> Option<u8> {
    let bytes = rest.as_bytes();
    let marker = *bytes.first()?;
    let level = match marker {
        b'=' => 1,
        b'-' => 2,
        _ => return None,
    };
    let run = bytes.iter().take_while(|&&b| b == marker).count();
    bytes[run..]
        .iter()
        .all(|b| is_space_or_tab(Some(b)))
        .then_some(level)
}

/// Headings are complete when they start; they never continue.
#[derive(Debug)]
pub struct HeadingParser {
    block: NodeId,
}

impl BlockParser for HeadingParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, _state: &ParserState) -> BlockContinue {
        BlockContinue::None
    }

    fn parse_inlines(&self, state: &ParserState, inline: &mut dyn InlineParser) {
        let text = state.block_text(self.block);
        inline.parse_block(
            self.block,
            BlockKind::Heading,
            text.trim(),
            state.properties(),
        );
    }
}

#[derive(Debug, Default)]
pub struct HeadingFactory;

impl BlockParserFactory for HeadingFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        if state.is_indented() {
            return None;
        }
        let next_non_space = state.next_non_space_index();
        let line_end = state.line().len();

        if let Some((level, begin, end)) = parse_atx(state.line(), next_non_space) {
            let line_start = state.line_start();
            let block = state.new_block(
                BlockKind::Heading,
                BlockAttrs::Heading {
                    level,
                    setext: false,
                },
            );
            state.tree_mut().get_mut(block).content = BlockContent::from_lines(vec![
                BlockLine::new(Span::new(line_start + begin, line_start + end)),
            ]);
            return Some(BlockStart::of(Box::new(HeadingParser { block })).at_index(line_end));
        }

        let level = setext_level(&state.line()[next_non_space..])?;
        let content = matched.paragraph_content(state)?.clone();
        let block = state.new_block(
            BlockKind::Heading,
            BlockAttrs::Heading {
                level,
                setext: true,
            },
        );
        state.tree_mut().get_mut(block).content = content;
        Some(
            BlockStart::of(Box::new(HeadingParser { block }))
                .at_index(line_end)
                .replace_active_block_parser(),
        )
    }
}
