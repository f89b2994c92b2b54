use crate::{
    error::ParseError,
    parsing::blocks::{BlockKind, NodeId, ParserState},
};

use super::{DependencyId, ParagraphPreProcessor, ParagraphPreProcessorFactory, ResolvedDependencies};

const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

type Instances = Vec<(DependencyId, Box<dyn ParagraphPreProcessor>)>;

/// Offers every live paragraph to each stage's pre-processors, stage by
/// stage. Returns the number of prefixes consumed.
pub fn run(
    stages: &ResolvedDependencies<Box<dyn ParagraphPreProcessorFactory>>,
    state: &mut ParserState,
) -> Result<usize, ParseError> {
    let mut changes = 0;
    for stage in stages.stages() {
        let paragraphs = state.registry().blocks_of_kind(BlockKind::Paragraph);
        if paragraphs.is_empty() {
            break;
        }
        let mut instances: Instances = stage
            .iter()
            .map(|factory| (factory.dependency_id(), factory.create(state)))
            .collect();
        for paragraph in paragraphs {
            if state.registry().is_live(paragraph) {
                changes += pre_process_paragraph(paragraph, &mut instances, state)?;
            }
        }
    }
    Ok(changes)
}

/// Repeats the stage over one paragraph until a full pass consumes
/// nothing. A single pre-processor gets one pass: it is expected to consume
/// everything it recognizes at once.
fn pre_process_paragraph(
    paragraph: NodeId,
    instances: &mut Instances,
    state: &mut ParserState,
) -> Result<usize, ParseError> {
    let mut changes = 0;
    loop {
        let mut had_changes = false;
        for (id, processor) in instances.iter_mut() {
            let text = state.block_text(paragraph);
            let consumed = processor.pre_process_block(paragraph, state);
            if consumed == 0 {
                continue;
            }
            if !state.registry().is_live(paragraph) {
                return Ok(changes + 1);
            }
            if consumed > text.len() || !text.is_char_boundary(consumed) {
                return Err(ParseError::PreProcessorOverrun {
                    processor: id.name(),
                    consumed,
                    available: text.len(),
                });
            }
            had_changes = true;
            changes += 1;

            let rest = text[consumed..].trim_start_matches(WHITESPACE);
            if rest.is_empty() {
                state.remove_block(paragraph);
                return Ok(changes);
            }

            let skip = text.len() - rest.len();
            let content = &mut state.tree_mut().get_mut(paragraph).content;
            content.skip_prefix(skip);
            let remaining = content.len();
            if remaining >= text.len() {
                return Err(ParseError::NonShrinkingPreProcessor {
                    processor: id.name(),
                    block: paragraph,
                    before: text.len(),
                    after: remaining,
                });
            }
        }
        if !had_changes || instances.len() < 2 {
            return Ok(changes);
        }
    }
}
