use thiserror::Error;

use crate::parsing::blocks::NodeId;

/// Invalid parser configuration, reported by [`ParserBuilder::build`](crate::parsing::ParserBuilder::build).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Pre-processor {name} is registered more than once")]
    DuplicateFactory { name: &'static str },

    #[error("Pre-processor ordering constraints form a cycle among: {}", .names.join(", "))]
    DependencyCycle { names: Vec<&'static str> },
}

/// Failure while parsing one document.
///
/// Apart from [`ParseError::Io`] these indicate a misbehaving extension;
/// the core parsers never produce them.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Block parser factory {factory} returned a block start without parsers on line {line} (1-based)")]
    EmptyBlockStart { factory: String, line: usize },

    #[error("Pre-processor {processor} returned block {block}, which is not a detached node")]
    BlockNotDetached {
        processor: &'static str,
        block: NodeId,
    },

    #[error("Pre-processor {processor} consumed {consumed} bytes of a {available} byte paragraph")]
    PreProcessorOverrun {
        processor: &'static str,
        consumed: usize,
        available: usize,
    },

    #[error("Pre-processor {processor} did not shrink paragraph {block} ({before} -> {after} bytes)")]
    NonShrinkingPreProcessor {
        processor: &'static str,
        block: NodeId,
        before: usize,
        after: usize,
    },
}
