use xi_rope::Rope;

use super::{
    blocks::{BlockKind, BlockTree, NodeId},
    properties::{PropertyBag, ReferenceMap},
    snapshot,
};

/// A parsed document: the source, its block tree and the document properties.
#[derive(Debug)]
pub struct Document {
    source: Rope,
    tree: BlockTree,
    properties: PropertyBag,
}

impl Document {
    pub(crate) fn new(source: Rope, tree: BlockTree, properties: PropertyBag) -> Self {
        Self {
            source,
            tree,
            properties,
        }
    }

    pub fn source(&self) -> &Rope {
        &self.source
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn kind(&self, block: NodeId) -> BlockKind {
        self.tree.kind(block)
    }

    pub fn children(&self, block: NodeId) -> &[NodeId] {
        self.tree.children(block)
    }

    /// Literal content of a leaf block, EOL markers included.
    pub fn text_of(&self, block: NodeId) -> String {
        self.tree.get(block).content.text(&self.source)
    }

    /// Content lines of a leaf block, EOL markers stripped.
    pub fn lines_of(&self, block: NodeId) -> Vec<String> {
        self.tree.get(block).content.line_texts(&self.source)
    }

    /// Reference definitions collected while parsing, if any.
    pub fn references(&self) -> Option<&ReferenceMap> {
        self.properties.get::<ReferenceMap>()
    }

    /// Indented text rendering of the block tree, see [`snapshot::outline`].
    pub fn outline(&self) -> String {
        snapshot::outline(self)
    }

    /// Every block reachable from the root, in document order.
    pub fn blocks(&self) -> Vec<NodeId> {
        self.tree
            .descendants(self.root())
            .into_iter()
            .map(|(block, _)| block)
            .collect()
    }
}
