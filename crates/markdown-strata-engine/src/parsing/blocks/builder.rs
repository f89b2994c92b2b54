//! Line-by-line incorporation of the source into the block tree.
//!
//! For each line the builder:
//!
//! 1. asks every open parser below the document, outermost first, whether
//!    the line continues its block
//! 2. breaks out of lists after a second consecutive blank line
//! 3. offers the position to the block-start factories while the deepest
//!    matched parser is a paragraph or a container
//! 4. appends the rest of the line as a lazy paragraph continuation, to the
//!    tip, or to a fresh paragraph
//!
//! Once the input is exhausted every open block is closed and the
//! pre-processing and inline phases run over the finished tree.

use xi_rope::Rope;

use crate::{
    error::ParseError,
    parsing::{
        document::Document,
        inline::InlineParser,
        phase::ParserPhase,
        preprocess::{self, PreProcessorStages},
        rope::{LineRef, lines_with_spans},
    },
};

use super::{
    containers::OpenBlock,
    kinds::{document::DocumentParser, paragraph::ParagraphParser},
    open::{BlockParserFactory, MatchedBlockParser, Reposition, find_block_start},
    parser::{BlockContinue, BlockParser},
    registry::ParserId,
    scanner::CODE_BLOCK_INDENT,
    state::ParserState,
    types::{BlockAttrs, BlockKind},
};

pub struct BlockBuilder<'p> {
    factories: &'p [Box<dyn BlockParserFactory>],
    pre_processors: &'p PreProcessorStages,
    state: ParserState,
    /// Every parser ever activated, indexed by [`ParserId`].
    parsers: Vec<Box<dyn BlockParser>>,
}

impl<'p> BlockBuilder<'p> {
    pub fn new(
        source: Rope,
        factories: &'p [Box<dyn BlockParserFactory>],
        pre_processors: &'p PreProcessorStages,
    ) -> Self {
        let state = ParserState::new(source);
        let root = state.tree().root();
        let mut builder = Self {
            factories,
            pre_processors,
            state,
            parsers: Vec::new(),
        };
        builder.activate(Box::new(DocumentParser::new(root)));
        builder
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Runs every phase and returns the finished document.
    pub fn parse(mut self, inline: &mut dyn InlineParser) -> Result<Document, ParseError> {
        self.state.set_phase(ParserPhase::Starting);
        self.incorporate_all()?;
        self.finalize_and_process(inline)
    }

    fn incorporate_all(&mut self) -> Result<(), ParseError> {
        self.state.set_phase(ParserPhase::ParseBlocks);
        let source = self.state.source().clone();
        for line in lines_with_spans(&source) {
            self.incorporate_line(line)?;
        }
        let open = self.state.open_blocks().as_slice().to_vec();
        self.finalize_all(&open);
        Ok(())
    }

    fn incorporate_line(&mut self, line: LineRef) -> Result<(), ParseError> {
        log::trace!("line {}: {:?}", line.number, line.content());
        self.state.scanner_mut().reset(line);

        let open = self.state.open_blocks().as_slice().to_vec();
        let mut matches = 1;
        for entry in open.iter().skip(1) {
            self.state.scanner_mut().find_next_non_space();
            match self.parsers[entry.parser.0].try_continue(&self.state) {
                BlockContinue::None => break,
                BlockContinue::Finalize => {
                    self.finalize(entry.parser);
                    return Ok(());
                }
                BlockContinue::Matched => {}
                BlockContinue::AtIndex(index) => self.state.scanner_mut().set_new_index(index),
                BlockContinue::AtColumn(column) => {
                    self.state.scanner_mut().set_new_column(column);
                }
            }
            matches += 1;
        }

        log::trace!("matched {matches} of {} open blocks", open.len());
        let mut unmatched = open[matches..].to_vec();
        let mut last_matched = open[matches - 1];
        let mut all_closed = unmatched.is_empty();

        // blank status as seen by the last continuation check
        if self.state.is_blank() && self.state.is_last_line_blank(last_matched.block) {
            if let Some(outer) = open[1..matches]
                .iter()
                .position(|entry| self.parsers[entry.parser.0].break_out_on_double_blank_line())
                .map(|pos| pos + 1)
            {
                let broken = open[outer..].to_vec();
                self.finalize_all(&broken);
                last_matched = open[outer - 1];
                unmatched.clear();
                all_closed = true;
            }
        }

        let mut current = last_matched;
        let mut try_block_starts = self.is_paragraph_or_container(current.parser);
        while try_block_starts {
            self.state.scanner_mut().find_next_non_space();
            let next_non_space = self.state.next_non_space_index();

            if self.state.is_blank()
                || (self.state.indent() < CODE_BLOCK_INDENT
                    && self.state.line()[next_non_space..]
                        .chars()
                        .next()
                        .is_some_and(char::is_alphabetic))
            {
                self.state.scanner_mut().set_new_index(next_non_space);
                break;
            }

            let matched = MatchedBlockParser::new(
                current.parser,
                self.parsers[current.parser.0].as_ref(),
                &self.state,
            );
            let Some((factory, start)) = find_block_start(self.factories, &mut self.state, &matched)
            else {
                self.state.scanner_mut().set_new_index(next_non_space);
                break;
            };
            if start.parsers.is_empty() {
                return Err(ParseError::EmptyBlockStart {
                    factory: format!("{:?}", self.factories[factory]),
                    line: self.state.line_number() + 1,
                });
            }

            if !all_closed {
                self.finalize_all(&unmatched);
                all_closed = true;
            }
            match start.reposition {
                Reposition::Unchanged => {}
                Reposition::Index(index) => self.state.scanner_mut().set_new_index(index),
                Reposition::Column(column) => self.state.scanner_mut().set_new_column(column),
            }
            if start.replace_active {
                self.remove_active_block_parser();
            }
            for parser in start.parsers {
                try_block_starts = parser.is_container();
                current = self.add_child(parser);
            }
        }

        let tip_is_paragraph = self
            .state
            .open_blocks()
            .tip()
            .is_some_and(|tip| self.parsers[tip.parser.0].is_paragraph_parser());

        if !all_closed && !self.state.is_blank() && tip_is_paragraph {
            // lazy paragraph continuation
            self.add_line();
        } else {
            if !all_closed {
                self.finalize_all(&unmatched);
            }
            self.propagate_last_line_blank(current, last_matched);

            if !self.parsers[current.parser.0].is_container() {
                self.add_line();
            } else if !self.state.is_blank() {
                let block = self.state.new_block(BlockKind::Paragraph, BlockAttrs::None);
                self.add_child(Box::new(ParagraphParser::new(block)));
                self.add_line();
            }
        }
        Ok(())
    }

    fn is_paragraph_or_container(&self, parser: ParserId) -> bool {
        let parser = &self.parsers[parser.0];
        parser.is_paragraph_parser() || parser.is_container()
    }

    /// Gives the rest of the line to the tip.
    fn add_line(&mut self) {
        let line = self.state.rest_of_line();
        if let Some(tip) = self.state.open_blocks().tip() {
            self.parsers[tip.parser.0].add_line(&mut self.state, line);
        }
    }

    /// Closes tips until one can hold the new block, then links and activates it.
    fn add_child(&mut self, parser: Box<dyn BlockParser>) -> OpenBlock {
        let kind = self.state.tree().kind(parser.block());
        while let Some(tip) = self.state.open_blocks().tip() {
            if self.parsers[tip.parser.0].can_contain(kind) {
                break;
            }
            self.finalize(tip.parser);
        }
        let parent = self.state.active_block();
        self.state.tree_mut().append_child(parent, parser.block());
        self.activate(parser)
    }

    fn activate(&mut self, parser: Box<dyn BlockParser>) -> OpenBlock {
        let id = ParserId(self.parsers.len());
        let block = parser.block();
        self.parsers.push(parser);
        let open = OpenBlock { parser: id, block };
        self.state.open_blocks_mut().push(open);
        self.state.block_added(block, Some(id));
        self.state.registry_mut().add_parser(id);
        open
    }

    /// Drops the tip from the stack, the registry and the tree without closing it.
    fn remove_active_block_parser(&mut self) {
        if let Some(open) = self.state.open_blocks_mut().pop() {
            self.state.remove_block(open.block);
        }
    }

    fn finalize(&mut self, parser: ParserId) {
        if self.state.open_blocks().is_tip(parser) {
            self.state.open_blocks_mut().pop();
        }
        let block_parser = &mut self.parsers[parser.0];
        block_parser.close_block(&mut self.state);
        block_parser.finalize_closed_block();
    }

    /// Finalizes `entries` innermost first.
    fn finalize_all(&mut self, entries: &[OpenBlock]) {
        for entry in entries.iter().rev() {
            self.finalize(entry.parser);
        }
    }

    fn propagate_last_line_blank(&mut self, current: OpenBlock, last_matched: OpenBlock) {
        let blank = self.state.is_blank();
        if blank && let Some(last_child) = self.state.tree().last_child(current.block) {
            self.state.set_last_line_blank(last_child, true);
        }

        let opened_this_line = current.block != last_matched.block;
        let last_line_blank = blank
            && self.parsers[current.parser.0].counts_blank_lines(&self.state, opened_this_line);

        let mut node = Some(current.block);
        while let Some(block) = node {
            self.state.set_last_line_blank(block, last_line_blank);
            node = self.state.tree().parent(block);
        }
    }

    fn finalize_and_process(mut self, inline: &mut dyn InlineParser) -> Result<Document, ParseError> {
        self.state.set_phase(ParserPhase::PreProcessParagraphs);
        let consumed = preprocess::paragraph::run(&self.pre_processors.paragraph, &mut self.state)?;

        self.state.set_phase(ParserPhase::PreProcessBlocks);
        let replaced = preprocess::block::run(&self.pre_processors.block, &mut self.state)?;
        log::debug!("pre-processing: {consumed} paragraph prefixes consumed, {replaced} blocks replaced");

        self.state.set_phase(ParserPhase::ParseInlines);
        inline.initialize_document(self.state.tree(), self.state.properties());
        for parser in self.state.registry().parsers() {
            self.parsers[parser.0].parse_inlines(&self.state, inline);
        }

        self.state.set_phase(ParserPhase::Done);
        inline.finalize_document(self.state.tree(), self.state.properties());

        let (source, tree, properties) = self.state.into_parts();
        Ok(Document::new(source, tree, properties))
    }

    /// Runs only the block phase, leaving the state ready for pre-processing.
    #[cfg(test)]
    pub(crate) fn into_block_state(mut self) -> Result<ParserState, ParseError> {
        self.state.set_phase(ParserPhase::Starting);
        self.incorporate_all()?;
        Ok(self.state)
    }
}
