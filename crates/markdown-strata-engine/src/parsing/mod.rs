//! # Parsing
//!
//! Block-level structure of CommonMark documents.
//!
//! A [`Parser`] is configured once, through [`ParserBuilder`], with block
//! parser factories and pre-processors, and can then parse any number of
//! documents. Each parse walks through the [`ParserPhase`]s: lines are
//! incorporated into the block tree, paragraphs and blocks are
//! pre-processed, and finally each block's literal content is handed to an
//! [`InlineParser`].

pub mod blocks;
pub mod document;
pub mod inline;
pub mod options;
pub mod phase;
pub mod preprocess;
pub mod properties;
pub mod rope;
pub mod snapshot;

#[cfg(test)]
mod tests;

use std::io::Read;

use xi_rope::Rope;

use crate::error::{ConfigError, ParseError};

use blocks::{BlockBuilder, BlockParserFactory, kinds::core_factories};
use preprocess::{
    BlockPreProcessorFactory, ParagraphPreProcessorFactory, PreProcessorStages,
    ReferencePreProcessorFactory, ResolvedDependencies, dependency,
};

pub use document::Document;
pub use inline::{InlineParser, NoopInlineParser};
pub use options::ParserOptions;
pub use phase::ParserPhase;

/// A configured block parser. Immutable and reusable across documents.
#[derive(Debug)]
pub struct Parser {
    options: ParserOptions,
    factories: Vec<Box<dyn BlockParserFactory>>,
    pre_processors: PreProcessorStages,
}

impl Parser {
    /// A parser with every core block parser and no extensions.
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// A parser with the core block parsers enabled by `options`.
    pub fn with_options(options: ParserOptions) -> Self {
        let paragraph: Vec<Box<dyn ParagraphPreProcessorFactory>> = if options.reference_definitions {
            vec![Box::new(ReferencePreProcessorFactory)]
        } else {
            Vec::new()
        };
        Self {
            factories: core_factories(&options),
            pre_processors: PreProcessorStages {
                paragraph: ResolvedDependencies::single_stage(paragraph),
                block: ResolvedDependencies::default(),
            },
            options,
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, input: &str) -> Result<Document, ParseError> {
        self.parse_rope(&Rope::from(input))
    }

    pub fn parse_rope(&self, source: &Rope) -> Result<Document, ParseError> {
        self.parse_rope_with_inline(source, &mut NoopInlineParser)
    }

    /// Reads the whole of `reader` and parses it.
    pub fn parse_reader(&self, mut reader: impl Read) -> Result<Document, ParseError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        self.parse(&input)
    }

    pub fn parse_with_inline(
        &self,
        input: &str,
        inline: &mut dyn InlineParser,
    ) -> Result<Document, ParseError> {
        self.parse_rope_with_inline(&Rope::from(input), inline)
    }

    pub fn parse_rope_with_inline(
        &self,
        source: &Rope,
        inline: &mut dyn InlineParser,
    ) -> Result<Document, ParseError> {
        log::debug!("parsing {} bytes", source.len());
        BlockBuilder::new(source.clone(), &self.factories, &self.pre_processors).parse(inline)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects extensions for a [`Parser`].
///
/// Custom block parser factories are tried before the core ones, in
/// registration order. Pre-processors are ordered by their declared
/// dependencies when the parser is built.
#[derive(Debug, Default)]
pub struct ParserBuilder {
    options: ParserOptions,
    factories: Vec<Box<dyn BlockParserFactory>>,
    paragraph_pre_processors: Vec<Box<dyn ParagraphPreProcessorFactory>>,
    block_pre_processors: Vec<Box<dyn BlockPreProcessorFactory>>,
}

impl ParserBuilder {
    #[must_use]
    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn block_parser_factory(mut self, factory: impl BlockParserFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    #[must_use]
    pub fn paragraph_pre_processor(
        mut self,
        factory: impl ParagraphPreProcessorFactory + 'static,
    ) -> Self {
        self.paragraph_pre_processors.push(Box::new(factory));
        self
    }

    #[must_use]
    pub fn block_pre_processor(mut self, factory: impl BlockPreProcessorFactory + 'static) -> Self {
        self.block_pre_processors.push(Box::new(factory));
        self
    }

    /// Resolves pre-processor ordering. Fails on duplicates and cycles.
    pub fn build(self) -> Result<Parser, ConfigError> {
        let mut factories = self.factories;
        factories.extend(core_factories(&self.options));

        let mut paragraph = self.paragraph_pre_processors;
        if self.options.reference_definitions {
            paragraph.push(Box::new(ReferencePreProcessorFactory));
        }

        let pre_processors = PreProcessorStages {
            paragraph: dependency::resolve(paragraph)?,
            block: dependency::resolve(self.block_pre_processors)?,
        };
        log::debug!(
            "parser built: {} block factories, {} paragraph and {} block pre-processors",
            factories.len(),
            pre_processors.paragraph.len(),
            pre_processors.block.len()
        );

        Ok(Parser {
            options: self.options,
            factories,
            pre_processors,
        })
    }
}
