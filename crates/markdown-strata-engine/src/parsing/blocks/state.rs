//! Parse state shared with block parsers, factories and pre-processors.

use std::collections::HashMap;

use xi_rope::Rope;

use crate::parsing::{
    phase::ParserPhase,
    properties::PropertyBag,
    rope::{LineRef, Span},
};

use super::{
    containers::OpenBlocks,
    content::BlockLine,
    registry::{BlockRegistry, ParserId},
    scanner::LineScanner,
    tree::BlockTree,
    types::{BlockAttrs, BlockKind, NodeId},
};

/// Everything a block parser may observe or mutate while a document is parsed.
///
/// The builder owns the parser objects; this struct owns the tree, the
/// position in the current line, the open-block stack, the registries and
/// the per-block blank-line flags.
#[derive(Debug)]
pub struct ParserState {
    source: Rope,
    scanner: LineScanner,
    tree: BlockTree,
    open: OpenBlocks,
    registry: BlockRegistry,
    last_line_blank: HashMap<NodeId, bool>,
    properties: PropertyBag,
    phase: ParserPhase,
}

impl ParserState {
    pub fn new(source: Rope) -> Self {
        Self {
            source,
            scanner: LineScanner::new(),
            tree: BlockTree::new(),
            open: OpenBlocks::default(),
            registry: BlockRegistry::new(),
            last_line_blank: HashMap::new(),
            properties: PropertyBag::new(),
            phase: ParserPhase::NotStarted,
        }
    }

    // --- source and current line ---------------------------------------

    pub fn source(&self) -> &Rope {
        &self.source
    }

    /// Current line without its EOL marker.
    pub fn line(&self) -> &str {
        self.scanner.line()
    }

    pub fn line_ref(&self) -> &LineRef {
        self.scanner.line_ref()
    }

    pub fn line_number(&self) -> usize {
        self.scanner.line_ref().number
    }

    /// Source offset of the start of the current line.
    pub fn line_start(&self) -> usize {
        self.scanner.line_ref().span.start
    }

    pub fn eol_span(&self) -> Span {
        self.scanner.line_ref().eol
    }

    pub fn index(&self) -> usize {
        self.scanner.index()
    }

    pub fn column(&self) -> usize {
        self.scanner.column()
    }

    pub fn next_non_space_index(&self) -> usize {
        self.scanner.next_non_space_index()
    }

    pub fn next_non_space_column(&self) -> usize {
        self.scanner.next_non_space_column()
    }

    pub fn indent(&self) -> usize {
        self.scanner.indent()
    }

    pub fn is_indented(&self) -> bool {
        self.scanner.is_indented()
    }

    pub fn is_blank(&self) -> bool {
        self.scanner.is_blank()
    }

    /// The rest of the current line from the scan position, EOL included.
    pub fn rest_of_line(&self) -> BlockLine {
        self.scanner.rest()
    }

    pub(crate) fn scanner_mut(&mut self) -> &mut LineScanner {
        &mut self.scanner
    }

    // --- tree and open blocks -----------------------------------------------

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BlockTree {
        &mut self.tree
    }

    /// Allocates a detached block for a parser that is about to start.
    pub fn new_block(&mut self, kind: BlockKind, attrs: BlockAttrs) -> NodeId {
        self.tree.create(kind, attrs)
    }

    /// Materialized content of `block`, EOL markers included.
    pub fn block_text(&self, block: NodeId) -> String {
        self.tree.get(block).content.text(&self.source)
    }

    pub fn open_blocks(&self) -> &OpenBlocks {
        &self.open
    }

    pub(crate) fn open_blocks_mut(&mut self) -> &mut OpenBlocks {
        &mut self.open
    }

    /// The block of the innermost open parser.
    pub fn active_block(&self) -> NodeId {
        self.open.tip().map_or(self.tree.root(), |open| open.block)
    }

    pub fn active_kind(&self) -> BlockKind {
        self.tree.kind(self.active_block())
    }

    // --- registry -------------------------------------------------------------

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Records a newly live block, optionally owned by `parser`.
    pub fn block_added(&mut self, block: NodeId, parser: Option<ParserId>) {
        let kind = self.tree.kind(block);
        self.registry.block_added(block, kind, parser);
    }

    /// Purges `block` from the registry and the blank-line map and unlinks it
    /// from the tree.
    pub fn remove_block(&mut self, block: NodeId) {
        log::trace!("removing {} {block}", self.tree.kind(block));
        let kind = self.tree.kind(block);
        self.registry.remove_block(block, kind);
        self.last_line_blank.remove(&block);
        self.tree.unlink(block);
    }

    pub(crate) fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    // --- blank lines ----------------------------------------------------------

    pub fn is_last_line_blank(&self, block: NodeId) -> bool {
        self.last_line_blank.get(&block).copied().unwrap_or(false)
    }

    pub fn set_last_line_blank(&mut self, block: NodeId, blank: bool) {
        self.last_line_blank.insert(block, blank);
    }

    // --- phase and properties --------------------------------------------------

    pub fn phase(&self) -> ParserPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: ParserPhase) {
        debug_assert!(phase > self.phase, "phase {phase} revisited");
        log::debug!("parser phase {} -> {phase}", self.phase);
        self.phase = phase;
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    pub(crate) fn into_parts(self) -> (Rope, BlockTree, PropertyBag) {
        (self.source, self.tree, self.properties)
    }
}
