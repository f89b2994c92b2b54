use crate::parsing::blocks::{
    parser::{BlockContinue, BlockParser},
    state::ParserState,
    types::{BlockKind, NodeId},
};

/// Owns the root. Matches every line and accepts any child.
#[derive(Debug)]
pub struct DocumentParser {
    block: NodeId,
}

impl DocumentParser {
    pub fn new(block: NodeId) -> Self {
        Self { block }
    }
}

impl BlockParser for DocumentParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, _state: &ParserState) -> BlockContinue {
        BlockContinue::Matched
    }

    fn can_contain(&self, candidate: BlockKind) -> bool {
        candidate != BlockKind::Document
    }

    fn is_container(&self) -> bool {
        true
    }
}
