//! Arena of block nodes.
//!
//! Parent, child and sibling links are [`NodeId`]s, never ownership. A node
//! is created detached, linked once with [`BlockTree::append_child`] or
//! [`BlockTree::insert_after`], and may later be unlinked. Slots are never
//! reused within one parse, so an id stays valid for the tree's lifetime.

use super::{
    content::BlockContent,
    types::{BlockAttrs, BlockKind, NodeId},
};

/// A structural node of the document.
#[derive(Debug, Clone)]
pub struct Block {
    kind: BlockKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Literal content for leaf blocks (paragraphs, code, headings, HTML).
    pub content: BlockContent,
    /// Kind-specific data.
    pub attrs: BlockAttrs,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The block tree, rooted at a single [`BlockKind::Document`] node.
#[derive(Debug, Clone)]
pub struct BlockTree {
    nodes: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.create(BlockKind::Document, BlockAttrs::None);
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Allocates a detached node.
    pub fn create(&mut self, kind: BlockKind, attrs: BlockAttrs) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Block {
            kind,
            parent: None,
            children: Vec::new(),
            content: BlockContent::new(),
            attrs,
        });
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> &Block {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Block {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> BlockKind {
        self.get(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).children.last().copied()
    }

    /// The sibling directly after `id`, if any.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// True if `id` is the root or reachable from it through parent links.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut node = id;
        loop {
            if node == self.root() {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Links a detached `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "{child} is already linked");
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
    }

    /// Links a detached `node` directly after `anchor` under the same parent.
    ///
    /// Does nothing if `anchor` itself is detached.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        let Some(parent) = self.parent(anchor) else {
            return;
        };
        let siblings = &mut self.get_mut(parent).children;
        let pos = siblings
            .iter()
            .position(|&c| c == anchor)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(pos, node);
        self.get_mut(node).parent = Some(parent);
    }

    /// Detaches `id` (and with it its subtree) from its parent.
    pub fn unlink(&mut self, id: NodeId) {
        if let Some(parent) = self.get_mut(id).parent.take() {
            self.get_mut(parent).children.retain(|&c| c != id);
        }
    }

    /// Pre-order walk of the subtree rooted at `id`, with depth.
    pub fn descendants(&self, id: NodeId) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(id, 0)];
        while let Some((node, depth)) = stack.pop() {
            out.push((node, depth));
            for &child in self.children(node).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_tree_has_document_root() {
        let tree = BlockTree::new();
        assert_eq!(tree.kind(tree.root()), BlockKind::Document);
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn append_and_unlink_keep_links_consistent() {
        let mut tree = BlockTree::new();
        let root = tree.root();
        let quote = tree.create(BlockKind::BlockQuote, BlockAttrs::None);
        let para = tree.create(BlockKind::Paragraph, BlockAttrs::None);
        tree.append_child(root, quote);
        tree.append_child(quote, para);
        assert!(tree.is_attached(para));

        tree.unlink(quote);
        assert!(tree.children(root).is_empty());
        assert!(!tree.is_attached(para));
        assert_eq!(tree.parent(para), Some(quote));
    }

    #[test]
    fn insert_after_keeps_document_order() {
        let mut tree = BlockTree::new();
        let root = tree.root();
        let a = tree.create(BlockKind::Paragraph, BlockAttrs::None);
        let c = tree.create(BlockKind::Paragraph, BlockAttrs::None);
        tree.append_child(root, a);
        tree.append_child(root, c);
        let b = tree.create(BlockKind::ThematicBreak, BlockAttrs::None);
        tree.insert_after(a, b);
        assert_eq!(tree.children(root), &[a, b, c]);
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.next_sibling(c), None);
    }

    #[test]
    fn every_created_node_gets_a_fresh_id() {
        let mut tree = BlockTree::new();
        let ids: Vec<_> = (0..3)
            .map(|_| tree.create(BlockKind::Paragraph, BlockAttrs::None))
            .collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
        tree.unlink(ids[0]);
        assert_eq!(tree.create(BlockKind::Paragraph, BlockAttrs::None), NodeId(4));
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut tree = BlockTree::new();
        let root = tree.root();
        let list = tree.create(BlockKind::ListBlock, BlockAttrs::None);
        let item = tree.create(BlockKind::ListItem, BlockAttrs::None);
        let para = tree.create(BlockKind::Paragraph, BlockAttrs::None);
        tree.append_child(root, list);
        tree.append_child(list, item);
        tree.append_child(root, para);
        let walk: Vec<_> = tree.descendants(root);
        assert_eq!(walk, vec![(root, 0), (list, 1), (item, 2), (para, 1)]);
    }
}
