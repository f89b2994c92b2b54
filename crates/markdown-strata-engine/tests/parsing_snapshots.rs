use std::{cell::RefCell, rc::Rc};

use insta::assert_snapshot;
use markdown_strata_engine::{
    ConfigError, ParseError,
    parsing::{
        Parser, ParserPhase,
        blocks::{
            BlockAttrs, BlockContinue, BlockKind, BlockLine, BlockParser, BlockParserFactory,
            BlockStart, MatchedBlockParser, NodeId, ParserState,
        },
        preprocess::{
            BlockPreProcessor, BlockPreProcessorFactory, DependencyId, Dependent,
            ParagraphPreProcessor, ParagraphPreProcessorFactory, ReferencePreProcessorFactory,
        },
        snapshot,
    },
};
use pretty_assertions::assert_eq;

type PhaseLog = Rc<RefCell<Vec<ParserPhase>>>;

const DIRECTIVE: BlockKind = BlockKind::Custom("Directive");

/// `%% name` lines become directive blocks; consecutive ones merge.
#[derive(Debug)]
struct DirectiveParser {
    block: NodeId,
}

impl BlockParser for DirectiveParser {
    fn block(&self) -> NodeId {
        self.block
    }

    fn try_continue(&mut self, state: &ParserState) -> BlockContinue {
        if state.line()[state.next_non_space_index()..].starts_with("%%") {
            BlockContinue::AtIndex(state.next_non_space_index() + 2)
        } else {
            BlockContinue::None
        }
    }

    fn add_line(&mut self, state: &mut ParserState, line: BlockLine) {
        state.tree_mut().get_mut(self.block).content.push(line);
    }
}

#[derive(Debug, Default)]
struct DirectiveFactory {
    phases: PhaseLog,
}

impl BlockParserFactory for DirectiveFactory {
    fn try_start(
        &self,
        state: &mut ParserState,
        _matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        self.phases.borrow_mut().push(state.phase());
        let start = state.next_non_space_index();
        if state.is_indented() || !state.line()[start..].starts_with("%%") {
            return None;
        }
        let block = state.new_block(DIRECTIVE, BlockAttrs::None);
        Some(BlockStart::of(Box::new(DirectiveParser { block })).at_index(start + 2))
    }
}

#[test]
fn custom_factories_run_before_core_ones() {
    let parser = Parser::builder()
        .block_parser_factory(DirectiveFactory::default())
        .build()
        .unwrap();
    let doc = parser.parse("%% one\n%%two\ntext\n\n# %% heading\n").unwrap();
    snapshot::invariants(&doc);
    assert_snapshot!(doc.outline(), @r#"
    Document
      Directive [" one", "two"]
      Paragraph ["text"]
      Heading(h1) ["%% heading"]
    "#);
}

#[test]
fn factories_observe_the_block_phase() {
    let phases = PhaseLog::default();
    let parser = Parser::builder()
        .block_parser_factory(DirectiveFactory {
            phases: Rc::clone(&phases),
        })
        .build()
        .unwrap();
    parser.parse("- a\n").unwrap();
    assert!(!phases.borrow().is_empty());
    assert!(phases.borrow().iter().all(|&p| p == ParserPhase::ParseBlocks));
}

#[derive(Debug)]
struct EmptyStartFactory;

impl BlockParserFactory for EmptyStartFactory {
    fn try_start(
        &self,
        _state: &mut ParserState,
        _matched: &MatchedBlockParser,
    ) -> Option<BlockStart> {
        Some(BlockStart::of_all(Vec::new()))
    }
}

#[test]
fn block_start_without_parsers_is_an_error() {
    let parser = Parser::builder()
        .block_parser_factory(EmptyStartFactory)
        .build()
        .unwrap();
    let err = parser.parse("\n> x\n").unwrap_err();
    assert!(matches!(err, ParseError::EmptyBlockStart { line: 2, .. }));
}

/// Consumes a leading `!!` line from paragraphs, recording the phase.
#[derive(Debug, Default)]
struct BangFactory {
    phases: PhaseLog,
}

impl Dependent for BangFactory {
    fn dependency_id(&self) -> DependencyId {
        DependencyId::of::<Self>()
    }

    fn runs_after(&self) -> Vec<DependencyId> {
        vec![DependencyId::of::<ReferencePreProcessorFactory>()]
    }
}

impl ParagraphPreProcessorFactory for BangFactory {
    fn create(&self, _state: &ParserState) -> Box<dyn ParagraphPreProcessor> {
        Box::new(Bang {
            phases: Rc::clone(&self.phases),
        })
    }
}

struct Bang {
    phases: PhaseLog,
}

impl ParagraphPreProcessor for Bang {
    fn pre_process_block(&mut self, paragraph: NodeId, state: &mut ParserState) -> usize {
        self.phases.borrow_mut().push(state.phase());
        let text = state.block_text(paragraph);
        if text.starts_with("!!") {
            text.find('\n').map_or(text.len(), |eol| eol + 1)
        } else {
            0
        }
    }
}

#[test]
fn paragraph_pre_processor_runs_after_references() {
    let phases = PhaseLog::default();
    let parser = Parser::builder()
        .paragraph_pre_processor(BangFactory {
            phases: Rc::clone(&phases),
        })
        .build()
        .unwrap();
    let doc = parser.parse("[r]: /x\n!! hidden\nshown\n").unwrap();
    assert_snapshot!(snapshot::outline(&doc), @r#"
    Document
      Paragraph ["shown"]
    "#);
    assert!(doc.references().unwrap().get("r").is_some());
    assert_eq!(phases.borrow()[0], ParserPhase::PreProcessParagraphs);
}

/// Turns level-one ATX headings into `Title` blocks.
#[derive(Debug)]
struct TitleFactory;

impl Dependent for TitleFactory {
    fn dependency_id(&self) -> DependencyId {
        DependencyId::of::<Self>()
    }
}

impl BlockPreProcessorFactory for TitleFactory {
    fn block_kinds(&self) -> Vec<BlockKind> {
        vec![BlockKind::Heading]
    }

    fn create(&self, _state: &ParserState) -> Box<dyn BlockPreProcessor> {
        Box::new(TitlePromoter)
    }
}

struct TitlePromoter;

impl BlockPreProcessor for TitlePromoter {
    fn pre_process(&mut self, state: &mut ParserState, block: NodeId) -> NodeId {
        assert_eq!(state.phase(), ParserPhase::PreProcessBlocks);
        let heading = state.tree().get(block);
        if !matches!(heading.attrs, BlockAttrs::Heading { level: 1, .. }) {
            return block;
        }
        let content = heading.content.clone();
        let title = state.new_block(BlockKind::Custom("Title"), BlockAttrs::None);
        state.tree_mut().get_mut(title).content = content;
        title
    }
}

#[test]
fn block_pre_processor_replaces_in_place() {
    let parser = Parser::builder()
        .block_pre_processor(TitleFactory)
        .build()
        .unwrap();
    let doc = parser.parse("# Top\n\n> ## Inner\n\n# Again\n").unwrap();
    snapshot::invariants(&doc);
    assert_snapshot!(snapshot::outline(&doc), @r#"
    Document
      Title ["Top"]
      BlockQuote
        Heading(h2) ["Inner"]
      Title ["Again"]
    "#);
}

#[test]
fn registering_a_pre_processor_twice_fails() {
    let err = Parser::builder()
        .paragraph_pre_processor(ReferencePreProcessorFactory)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateFactory { .. }));
}

#[derive(Debug)]
struct Ping;
#[derive(Debug)]
struct Pong;

impl Dependent for Ping {
    fn dependency_id(&self) -> DependencyId {
        DependencyId::of::<Self>()
    }

    fn runs_after(&self) -> Vec<DependencyId> {
        vec![DependencyId::of::<Pong>()]
    }
}

impl Dependent for Pong {
    fn dependency_id(&self) -> DependencyId {
        DependencyId::of::<Self>()
    }

    fn runs_after(&self) -> Vec<DependencyId> {
        vec![DependencyId::of::<Ping>()]
    }
}

impl BlockPreProcessorFactory for Ping {
    fn block_kinds(&self) -> Vec<BlockKind> {
        vec![BlockKind::Paragraph]
    }

    fn create(&self, _state: &ParserState) -> Box<dyn BlockPreProcessor> {
        Box::new(TitlePromoter)
    }
}

impl BlockPreProcessorFactory for Pong {
    fn block_kinds(&self) -> Vec<BlockKind> {
        vec![BlockKind::Paragraph]
    }

    fn create(&self, _state: &ParserState) -> Box<dyn BlockPreProcessor> {
        Box::new(TitlePromoter)
    }
}

#[test]
fn dependency_cycles_fail_the_build() {
    let err = Parser::builder()
        .block_pre_processor(Ping)
        .block_pre_processor(Pong)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::DependencyCycle { ref names } if names.len() == 2));
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn normalize_reports_spans_and_text() {
    let doc = Parser::new().parse("intro\n\n```sh\nls\n```\n").unwrap();
    let snap = snapshot::normalize(&doc);
    let rows: Vec<_> = snap
        .blocks
        .iter()
        .map(|b| (b.kind.as_str(), b.depth, b.attrs.as_deref(), b.span, b.text.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Document", 0, None, None, ""),
            ("Paragraph", 1, None, Some((0, 6)), "intro\n"),
            ("FencedCodeBlock", 1, Some("sh"), Some((13, 16)), "ls\n"),
        ]
    );
}
