use std::collections::{BTreeSet, HashMap};

use super::types::{BlockKind, NodeId};

/// Identifier of a block parser owned by the builder.
///
/// Ids are handed out in activation order, so ordering by id is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParserId(pub(crate) usize);

/// Indices over every live block and the parser that owns it.
///
/// A block is live from `block_added` until `remove_block`. Blocks that
/// replaced another during pre-processing are live without an owning parser.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    parsers: BTreeSet<ParserId>,
    owners: HashMap<NodeId, Option<ParserId>>,
    by_kind: HashMap<BlockKind, Vec<NodeId>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parser(&mut self, parser: ParserId) {
        self.parsers.insert(parser);
    }

    pub fn contains_parser(&self, parser: ParserId) -> bool {
        self.parsers.contains(&parser)
    }

    /// Registered parsers in activation order.
    pub fn parsers(&self) -> Vec<ParserId> {
        self.parsers.iter().copied().collect()
    }

    pub fn block_added(&mut self, block: NodeId, kind: BlockKind, parser: Option<ParserId>) {
        self.owners.insert(block, parser);
        self.by_kind.entry(kind).or_default().push(block);
    }

    /// Purges `block` from every index, returning its parser if it had one.
    pub fn remove_block(&mut self, block: NodeId, kind: BlockKind) -> Option<ParserId> {
        let parser = self.owners.remove(&block).flatten();
        if let Some(parser) = parser {
            self.parsers.remove(&parser);
        }
        if let Some(blocks) = self.by_kind.get_mut(&kind) {
            blocks.retain(|&b| b != block);
        }
        parser
    }

    pub fn is_live(&self, block: NodeId) -> bool {
        self.owners.contains_key(&block)
    }

    pub fn parser_of(&self, block: NodeId) -> Option<ParserId> {
        self.owners.get(&block).copied().flatten()
    }

    /// Live blocks of `kind`, in the order they were added.
    pub fn blocks_of_kind(&self, kind: BlockKind) -> Vec<NodeId> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removing_a_block_purges_all_indices() {
        let mut reg = BlockRegistry::new();
        let (p1, p2) = (ParserId(1), ParserId(2));
        let (a, b) = (NodeId(1), NodeId(2));
        reg.add_parser(p1);
        reg.add_parser(p2);
        reg.block_added(a, BlockKind::Paragraph, Some(p1));
        reg.block_added(b, BlockKind::Paragraph, Some(p2));

        assert_eq!(reg.remove_block(a, BlockKind::Paragraph), Some(p1));
        assert!(!reg.is_live(a));
        assert!(!reg.contains_parser(p1));
        assert_eq!(reg.blocks_of_kind(BlockKind::Paragraph), vec![b]);
        assert_eq!(reg.parsers(), vec![p2]);
    }

    #[test]
    fn parserless_blocks_are_live() {
        let mut reg = BlockRegistry::new();
        let a = NodeId(3);
        reg.block_added(a, BlockKind::Heading, None);
        assert!(reg.is_live(a));
        assert_eq!(reg.parser_of(a), None);
        assert_eq!(reg.remove_block(a, BlockKind::Heading), None);
    }

    #[test]
    fn parsers_iterate_in_activation_order() {
        let mut reg = BlockRegistry::new();
        for id in [ParserId(3), ParserId(0), ParserId(7)] {
            reg.add_parser(id);
        }
        assert_eq!(reg.parsers(), vec![ParserId(0), ParserId(3), ParserId(7)]);
    }
}
