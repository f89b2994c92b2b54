//! Block start negotiation: factories are offered the current position in
//! order and the first one to recognize a block start wins.

use std::fmt;

use super::{
    content::BlockContent,
    parser::BlockParser,
    registry::ParserId,
    state::ParserState,
    types::{BlockKind, NodeId},
};

/// Recognizes the start of one kind of block.
pub trait BlockParserFactory: fmt::Debug {
    /// Returns the parsers to open if a block of this kind starts at the
    /// current position. A factory that returns `Some` may allocate blocks
    /// with [`ParserState::new_block`]; one that returns `None` must not.
    fn try_start(&self, state: &mut ParserState, matched: &MatchedBlockParser)
    -> Option<BlockStart>;
}

/// The deepest open parser that matched the current line so far.
#[derive(Debug, Clone, Copy)]
pub struct MatchedBlockParser {
    parser: ParserId,
    block: NodeId,
    kind: BlockKind,
    is_paragraph: bool,
}

impl MatchedBlockParser {
    pub(crate) fn new(parser: ParserId, block_parser: &dyn BlockParser, state: &ParserState) -> Self {
        let block = block_parser.block();
        Self {
            parser,
            block,
            kind: state.tree().kind(block),
            is_paragraph: block_parser.is_paragraph_parser(),
        }
    }

    pub fn parser(&self) -> ParserId {
        self.parser
    }

    pub fn block(&self) -> NodeId {
        self.block
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn is_paragraph_parser(&self) -> bool {
        self.is_paragraph
    }

    /// The accumulated lines of the matched paragraph, if it is one.
    pub fn paragraph_content<'s>(&self, state: &'s ParserState) -> Option<&'s BlockContent> {
        self.is_paragraph
            .then(|| &state.tree().get(self.block).content)
    }
}

/// Where scanning resumes after a block start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reposition {
    #[default]
    Unchanged,
    Index(usize),
    Column(usize),
}

/// A recognized block start.
#[derive(Debug)]
pub struct BlockStart {
    pub(crate) parsers: Vec<Box<dyn BlockParser>>,
    pub(crate) reposition: Reposition,
    pub(crate) replace_active: bool,
}

impl BlockStart {
    pub fn of(parser: Box<dyn BlockParser>) -> Self {
        Self::of_all(vec![parser])
    }

    /// Several parsers opened in one step, outermost first (e.g. a list and its first item).
    pub fn of_all(parsers: Vec<Box<dyn BlockParser>>) -> Self {
        Self {
            parsers,
            reposition: Reposition::Unchanged,
            replace_active: false,
        }
    }

    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.reposition = Reposition::Index(index);
        self
    }

    #[must_use]
    pub fn at_column(mut self, column: usize) -> Self {
        self.reposition = Reposition::Column(column);
        self
    }

    /// The active parser is removed from the tree instead of having the new
    /// block nested under or after it.
    #[must_use]
    pub fn replace_active_block_parser(mut self) -> Self {
        self.replace_active = true;
        self
    }

    pub fn parsers(&self) -> &[Box<dyn BlockParser>] {
        &self.parsers
    }

    pub fn reposition(&self) -> Reposition {
        self.reposition
    }

    pub fn replaces_active(&self) -> bool {
        self.replace_active
    }
}

/// Offers the position to each factory in order. Returns the index of the
/// winning factory with its start.
pub(crate) fn find_block_start(
    factories: &[Box<dyn BlockParserFactory>],
    state: &mut ParserState,
    matched: &MatchedBlockParser,
) -> Option<(usize, BlockStart)> {
    factories
        .iter()
        .enumerate()
        .find_map(|(i, factory)| factory.try_start(state, matched).map(|start| (i, start)))
}
