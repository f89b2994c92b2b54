use crate::parsing::blocks::{
    content::BlockLine,
    open::{BlockParserFactory, BlockStart, MatchedBlockParser},
    parser::{BlockContinue, BlockParser},
    scanner::CODE_BLOCK_INDENT,
    state::ParserState,
    types::{BlockAttrs, BlockKind, NodeId},
};

pub const MIN_FENCE_LEN: usize = 3;

/// An opening fence: at least three backticks or tildes, plus the info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub fence_char: char,
    pub len: usize,
    pub info: String,
}

impl Fence {
    pub fn opening(rest: &str) -> Option<Fence> {
        let fence_char = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = rest.chars().take_while(|&c| c == fence_char).count();
        if len < MIN_FENCE_LEN {
            return None;
        }
        let info = &rest[len..];
        if fence_char == '`' && info.contains('`') {
            return None;
        }
        Some(Fence {
            fence_char,
            len,
            info: info.trim().to_string(),
        })
    }

    /// A closing fence uses the same char, is at least as long and carries no info.
    pub fn closes(&self, rest: &str) -> bool {
        let len = rest.chars().take_while(|&c| c == self.fence_char).count();
        len >= self.len && rest[len..].trim_matches([' ', '\t']).is_empty()
    }
}

/// Raw lines between an opening and a closing fence.
///
/// Up to `fence_indent` leading spaces are stripped from each content line.
/// An unclosed fence runs to the end of its container.
#[derive(Debug)]
pub struct FencedCodeParser {
    block: NodeId,
    fence: Fence,
    fence_indent: usize,
    /// The opening line is still pending in `add_line`.
    on_opening_line: bool,
}

impl BlockParser for FencedCodeParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        let line = state.line();
        let next_non_space = state.next_non_space_index();
        if state.indent() < CODE_BLOCK_INDENT && self.fence.closes(&line[next_non_space..]) {
            return BlockContinue::Finalize;
        }

        let bytes = line.as_bytes();
        let mut index = state.index();
        let mut strip = self.fence_indent;
        while strip > 0 && bytes.get(index) == Some(&b' ') {
            index += 1;
            strip -= 1;
        }
        BlockContinue::AtIndex(index)
    }

    fn add_line(&mut self, state: &mut ParserState, line: BlockLine) {
        if std::mem::take(&mut self.on_opening_line) {
            return;
        }
        state.tree_mut().get_mut(self.block).content.push(line);
    }

    fn counts_blank_lines(&self, _state: &ParserState, _opened_this_line: bool) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct FencedCodeFactory;

impl BlockParserFactory for FencedCodeFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        _matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        if state.is_indented() {
            return None;
        }
        let next_non_space = state.next_non_space_index();
        let fence = Fence::opening(&state.line()[next_non_space..])?;
        let fence_indent = state.indent();
        let block = state.new_block(
            BlockKind::FencedCodeBlock,
            BlockAttrs::FencedCode {
                fence_char: fence.fence_char,
                fence_len: fence.len,
                fence_indent,
                info: fence.info.clone(),
            },
        );
        let after_fence = next_non_space + fence.len;
        let parser = FencedCodeParser {
            block,
            fence,
            fence_indent,
            on_opening_line: true,
        };
        Some(BlockStart::of(Box::new(parser)).at_index(after_fence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backtick_fence_with_info() {
        let fence = Fence::opening("```rust ").unwrap();
        assert_eq!(fence.fence_char, '`');
        assert_eq!(fence.len, 3);
        assert_eq!(fence.info, "rust");
    }

    #[test]
    fn backtick_info_may_not_contain_backticks() {
        assert_eq!(Fence::opening("``` a`b"), None);
        assert!(Fence::opening("~~~ a`b").is_some());
    }

    #[test]
    fn short_runs_are_not_fences() {
        assert_eq!(Fence::opening("``"), None);
        assert_eq!(Fence::opening("abc"), None);
    }

    #[test]
    fn closing_fence_rules() {
        let fence = Fence::opening("~~~~").unwrap();
        assert!(fence.closes("~~~~"));
        assert!(fence.closes("~~~~~~  "));
        assert!(!fence.closes("~~~"));
        assert!(!fence.closes("````"));
        assert!(!fence.closes("~~~~ x"));
    }
}
