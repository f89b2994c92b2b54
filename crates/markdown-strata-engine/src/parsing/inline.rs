//! Hand-off boundary to the inline parser.
//!
//! Block parsing never interprets inline syntax. Once the block tree is
//! final, every registered block parser passes its literal content to an
//! [`InlineParser`].

use serde::Serialize;

use super::{
    blocks::{BlockKind, BlockTree, NodeId},
    properties::PropertyBag,
};

pub trait InlineParser {
    /// Called once with the finished block tree, before any block is parsed.
    fn initialize_document(&mut self, _tree: &BlockTree, _properties: &PropertyBag) {}

    /// Parses the literal content of one finished block.
    fn parse_block(&mut self, block: NodeId, kind: BlockKind, text: &str, properties: &PropertyBag);

    /// Called once after every block has been parsed.
    fn finalize_document(&mut self, _tree: &BlockTree, _properties: &PropertyBag) {}
}

/// Ignores all inline content.
#[derive(Debug, Default)]
pub struct NoopInlineParser;

impl InlineParser for NoopInlineParser {
    fn parse_block(&mut self, _: NodeId, _: BlockKind, _: &str, _: &PropertyBag) {}
}

/// One recorded hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineInput {
    pub block: NodeId,
    pub kind: BlockKind,
    pub text: String,
}

/// Records everything handed to the inline stage, for tooling and tests.
#[derive(Debug, Default)]
pub struct InlineTextCollector {
    pub inputs: Vec<InlineInput>,
    pub initialized: usize,
    pub finalized: usize,
}

impl InlineParser for InlineTextCollector {
    fn initialize_document(&mut self, _tree: &BlockTree, _properties: &PropertyBag) {
        self.initialized += 1;
    }

    fn parse_block(&mut self, block: NodeId, kind: BlockKind, text: &str, _: &PropertyBag) {
        self.inputs.push(InlineInput {
            block,
            kind,
            text: text.to_string(),
        });
    }

    fn finalize_document(&mut self, _tree: &BlockTree, _properties: &PropertyBag) {
        self.finalized += 1;
    }
}
