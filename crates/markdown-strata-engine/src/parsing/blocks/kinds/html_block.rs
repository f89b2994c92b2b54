//! Raw HTML blocks.
//!
//! Seven start conditions, tried in order. Conditions 1 to 5 run until a
//! line containing their end marker; 6 and 7 run until a blank line.
//! Condition 7 (any complete open or close tag alone on its line) cannot
//! interrupt a paragraph.

use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::blocks::{
    content::BlockLine,
    open::{BlockParserFactory, BlockStart, MatchedBlockParser},
    parser::{BlockContinue, BlockParser},
    state::ParserState,
    types::{BlockAttrs, BlockKind, NodeId},
};

const BLOCK_TAGS: &str = "address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h[1-6]|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul";

const TAG_NAME: &str = "[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE: &str = r#"(?:\s+[a-zA-Z_:][a-zA-Z0-9:._-]*(?:\s*=\s*(?:[^"'=<>`\x00-\x20]+|'[^']*'|"[^"]*"))?)"#;

fn start_patterns() -> &'static [Regex; 7] {
    static START: OnceLock<[Regex; 7]> = OnceLock::new();
    START.get_or_init(|| {
        let open_tag = format!(r"<{TAG_NAME}{ATTRIBUTE}*\s*/?>");
        let close_tag = format!(r"</{TAG_NAME}\s*>");
        [
            r"(?i)^<(?:script|pre|textarea|style)(?:\s|>|$)".to_string(),
            r"^<!--".to_string(),
            r"^<\?".to_string(),
            r"^<![A-Za-z]".to_string(),
            r"^<!\[CDATA\[".to_string(),
            format!(r"(?i)^</?(?:{BLOCK_TAGS})(?:\s|/?>|$)"),
            format!(r"(?i)^(?:{open_tag}|{close_tag})\s*$"),
        ]
        .map(|pattern| Regex::new(&pattern).expect("Invalid HTML block start regex"))
    })
}

fn end_patterns() -> &'static [Regex; 5] {
    static END: OnceLock<[Regex; 5]> = OnceLock::new();
    END.get_or_init(|| {
        [
            r"(?i)</(?:script|pre|textarea|style)>",
            r"-->",
            r"\?>",
            r">",
            r"\]\]>",
        ]
        .map(|pattern| Regex::new(pattern).expect("Invalid HTML block end regex"))
    })
}

/// The start condition (1-based) matched by `rest`, which begins at the
/// line's first non-space character.
pub fn start_condition(rest: &str, can_interrupt_paragraph: bool) -> Option<u8> {
    if !rest.starts_with('<') {
        return None;
    }
    start_patterns()
        .iter()
        .zip(1u8..)
        .find(|(pattern, condition)| {
            (*condition < 7 || can_interrupt_paragraph) && pattern.is_match(rest)
        })
        .map(|(_, condition)| condition)
}

/// True if `line` contains the end marker of `condition`. Conditions 6 and 7
/// have none.
pub fn ends_block(condition: u8, line: &str) -> bool {
    end_patterns()
        .get(usize::from(condition).wrapping_sub(1))
        .is_some_and(|pattern| pattern.is_match(line))
}

#[derive(Debug)]
pub struct HtmlBlockParser {
    block: NodeId,
    condition: u8,
    finished: bool,
}

impl BlockParser for HtmlBlockParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        if self.finished || (state.is_blank() && self.condition >= 6) {
            BlockContinue::None
        } else {
            BlockContinue::Matched
        }
    }

    fn add_line(&mut self, state: &mut ParserState, line: BlockLine) {
        if ends_block(self.condition, &line.text(state.source())) {
            self.finished = true;
        }
        state.tree_mut().get_mut(self.block).content.push(line);
    }
}

#[derive(Debug, Default)]
pub struct HtmlBlockFactory;

impl BlockParserFactory for HtmlBlockFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        if state.is_indented() {
            return None;
        }
        let can_interrupt_paragraph =
            !matched.is_paragraph_parser() && state.active_kind() != BlockKind::Paragraph;
        let condition = start_condition(
            &state.line()[state.next_non_space_index()..],
            can_interrupt_paragraph,
        )?;
        let block = state.new_block(BlockKind::HtmlBlock, BlockAttrs::Html { condition });
        let parser = HtmlBlockParser {
            block,
            condition,
            finished: false,
        };
        Some(BlockStart::of(Box::new(parser)).at_index(state.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<script type=\"x\">", Some(1))]
    #[case("<PRE>", Some(1))]
    #[case("<!-- note", Some(2))]
    #[case("<?php", Some(3))]
    #[case("<!DOCTYPE html>", Some(4))]
    #[case("<![CDATA[", Some(5))]
    #[case("<div class=\"a\">", Some(6))]
    #[case("</table>", Some(6))]
    #[case("<custom-tag attr='1'>", Some(7))]
    #[case("</custom-tag>  ", Some(7))]
    #[case("<custom-tag> text", None)]
    #[case("<scripts>", Some(7))]
    #[case("div", None)]
    fn start_conditions(#[case] rest: &str, #[case] expected: Option<u8>) {
        assert_eq!(start_condition(rest, true), expected);
    }

    #[test]
    fn condition_seven_cannot_interrupt_a_paragraph() {
        assert_eq!(start_condition("<custom-tag>", false), None);
        assert_eq!(start_condition("<div>", false), Some(6));
    }

    #[rstest]
    #[case(1, "x </style> y", true)]
    #[case(2, "done -->", true)]
    #[case(3, "?>", true)]
    #[case(4, "x>", true)]
    #[case(5, "]]>", true)]
    #[case(2, "--", false)]
    #[case(6, "</div>", false)]
    #[case(7, "</x>", false)]
    fn end_markers(#[case] condition: u8, #[case] line: &str, #[case] expected: bool) {
        assert_eq!(ends_block(condition, line), expected);
    }
}
