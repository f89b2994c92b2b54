use super::{registry::ParserId, types::NodeId};

/// One entry of the open-block stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBlock {
    pub parser: ParserId,
    pub block: NodeId,
}

/// The path of currently open blocks, document first, tip last.
///
/// # Invariants
///
/// - entry 0 is the document parser until the end of input
/// - each entry's block is a child of the previous entry's block
#[derive(Debug, Default, Clone)]
pub struct OpenBlocks(Vec<OpenBlock>);

impl OpenBlocks {
    pub fn push(&mut self, open: OpenBlock) {
        self.0.push(open);
    }

    pub fn pop(&mut self) -> Option<OpenBlock> {
        self.0.pop()
    }

    /// The innermost open block.
    pub fn tip(&self) -> Option<OpenBlock> {
        self.0.last().copied()
    }

    pub fn is_tip(&self, parser: ParserId) -> bool {
        self.tip().is_some_and(|open| open.parser == parser)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[OpenBlock] {
        &self.0
    }

    pub fn parsers(&self) -> Vec<ParserId> {
        self.0.iter().map(|open| open.parser).collect()
    }
}
