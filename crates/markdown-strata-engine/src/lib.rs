//! Block-level parsing of CommonMark documents into a tree of blocks.
//!
//! ```
//! use markdown_strata_engine::parsing::{Parser, blocks::BlockKind};
//!
//! let doc = Parser::new().parse("> quoted\n\nplain\n").unwrap();
//! let kinds: Vec<_> = doc.children(doc.root()).iter().map(|&b| doc.kind(b)).collect();
//! assert_eq!(kinds, [BlockKind::BlockQuote, BlockKind::Paragraph]);
//! ```

pub mod error;
pub mod parsing;

pub use error::{ConfigError, ParseError};
pub use parsing::{Document, Parser, ParserBuilder, ParserOptions};
