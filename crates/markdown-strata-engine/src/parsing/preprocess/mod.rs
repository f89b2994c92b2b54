//! # Pre-processing
//!
//! Runs after every block is closed and before inline parsing.
//!
//! - **Paragraph pre-processors** consume a prefix of a paragraph's text
//!   (for example reference definitions). A fully consumed paragraph is
//!   removed from the tree.
//! - **Block pre-processors** may replace a block of a kind they subscribe
//!   to with a new, detached block.
//!
//! Both kinds are grouped into stages by their declared ordering
//! constraints; see [`dependency::resolve`].

pub mod block;
pub mod dependency;
pub mod paragraph;
pub mod reference;

use std::fmt;

use crate::parsing::blocks::{BlockKind, NodeId, ParserState};

pub use dependency::{DependencyId, Dependent, ResolvedDependencies};
pub use reference::{ReferencePreProcessor, ReferencePreProcessorFactory};

pub trait ParagraphPreProcessor {
    /// Returns how many bytes of the paragraph's text were consumed, 0 if none.
    fn pre_process_block(&mut self, paragraph: NodeId, state: &mut ParserState) -> usize;
}

pub trait ParagraphPreProcessorFactory: Dependent + fmt::Debug {
    /// Called once per stage, before any paragraph is offered.
    fn create(&self, state: &ParserState) -> Box<dyn ParagraphPreProcessor>;
}

pub trait BlockPreProcessor {
    /// Returns `block` to leave it in place, or a detached block to replace it with.
    fn pre_process(&mut self, state: &mut ParserState, block: NodeId) -> NodeId;
}

pub trait BlockPreProcessorFactory: Dependent + fmt::Debug {
    /// The block kinds this pre-processor is offered.
    fn block_kinds(&self) -> Vec<BlockKind>;

    /// Called at most once per parse, when the first eligible block is reached.
    fn create(&self, state: &ParserState) -> Box<dyn BlockPreProcessor>;
}

/// Resolved pre-processor stages of one configured parser.
#[derive(Debug, Default)]
pub struct PreProcessorStages {
    pub paragraph: ResolvedDependencies<Box<dyn ParagraphPreProcessorFactory>>,
    pub block: ResolvedDependencies<Box<dyn BlockPreProcessorFactory>>,
}
