//! # Block Parsing
//!
//! Incremental construction of the block tree, one source line at a time.
//!
//! ## Modules
//!
//! - **`types`**: `NodeId`, `BlockKind`, `BlockAttrs`
//! - **`tree`**: `BlockTree` arena with parent/child/sibling links
//! - **`content`**: `BlockContent`, the source spans of a leaf block's lines
//! - **`scanner`**: tab-aware index/column tracking within the current line
//! - **`state`**: `ParserState`, everything parsers observe and mutate
//! - **`registry`**: live blocks, their owning parsers and a per-kind index
//! - **`containers`**: the open-block stack
//! - **`parser`**: the `BlockParser` contract
//! - **`open`**: `BlockParserFactory` and block start negotiation
//! - **`kinds`**: the core CommonMark parsers
//! - **`builder`**: `BlockBuilder`, which drives all of the above
//!
//! ## Key Invariants
//!
//! - The open-block stack always starts with the document parser
//! - Every open block is attached to the tree; entry `i + 1` is a child of entry `i`
//! - A block is registered exactly while it is attached and live
//! - Fenced code and HTML blocks are raw zones: no block starts inside them

pub mod builder;
pub mod containers;
pub mod content;
pub mod kinds;
pub mod open;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod state;
pub mod tree;
pub mod types;

pub use builder::BlockBuilder;
pub use content::{BlockContent, BlockLine};
pub use open::{BlockParserFactory, BlockStart, MatchedBlockParser, Reposition};
pub use parser::{BlockContinue, BlockParser};
pub use registry::{BlockRegistry, ParserId};
pub use state::ParserState;
pub use tree::{Block, BlockTree};
pub use types::{BlockAttrs, BlockKind, ListMarker, NodeId};
