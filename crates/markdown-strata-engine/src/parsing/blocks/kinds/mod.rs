//! The core CommonMark block parsers and their factories.

pub mod block_quote;
pub mod code_fence;
pub mod document;
pub mod heading;
pub mod html_block;
pub mod indented_code;
pub mod list;
pub mod paragraph;
pub mod thematic_break;

use crate::parsing::options::ParserOptions;

use super::open::BlockParserFactory;

pub use block_quote::{BlockQuoteFactory, BlockQuoteParser};
pub use code_fence::{Fence, FencedCodeFactory, FencedCodeParser};
pub use document::DocumentParser;
pub use heading::{HeadingFactory, HeadingParser};
pub use html_block::{HtmlBlockFactory, HtmlBlockParser};
pub use indented_code::{IndentedCodeFactory, IndentedCodeParser};
pub use list::{ListBlockParser, ListFactory, ListItemParser};
pub use paragraph::ParagraphParser;
pub use thematic_break::{ThematicBreakFactory, ThematicBreakParser};

/// The enabled core factories in precedence order.
///
/// Thematic breaks come before lists so `- - -` is a break, and headings
/// before thematic breaks so a `---` under a paragraph is a setext underline.
pub fn core_factories(options: &ParserOptions) -> Vec<Box<dyn BlockParserFactory>> {
    let mut factories: Vec<Box<dyn BlockParserFactory>> = Vec::new();
    if options.block_quotes {
        factories.push(Box::new(BlockQuoteFactory));
    }
    if options.headings {
        factories.push(Box::new(HeadingFactory));
    }
    if options.fenced_code_blocks {
        factories.push(Box::new(FencedCodeFactory));
    }
    if options.html_blocks {
        factories.push(Box::new(HtmlBlockFactory));
    }
    if options.thematic_breaks {
        factories.push(Box::new(ThematicBreakFactory));
    }
    if options.lists {
        factories.push(Box::new(ListFactory));
    }
    if options.indented_code_blocks {
        factories.push(Box::new(IndentedCodeFactory));
    }
    factories
}
