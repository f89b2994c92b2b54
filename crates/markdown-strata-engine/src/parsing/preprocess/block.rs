use std::collections::HashMap;

use crate::{
    error::ParseError,
    parsing::blocks::{BlockKind, NodeId, ParserState},
};

use super::{BlockPreProcessor, BlockPreProcessorFactory, DependencyId, ResolvedDependencies};

/// Offers every live block of a subscribed kind to the block
/// pre-processors, stage by stage. Returns the number of replacements.
///
/// Within a stage each kind is walked once, the kinds in the order the
/// stage's factories first name them. A block is offered to each of its
/// kind's pre-processors in turn; after a replacement the remaining ones
/// see the new block, unless its kind differs, which ends the block's turn.
pub fn run(
    stages: &ResolvedDependencies<Box<dyn BlockPreProcessorFactory>>,
    state: &mut ParserState,
) -> Result<usize, ParseError> {
    let mut instances: HashMap<DependencyId, Box<dyn BlockPreProcessor>> = HashMap::new();
    let mut replaced = 0;

    for stage in stages.stages() {
        for (kind, factories) in factories_by_kind(stage) {
            for original in state.registry().blocks_of_kind(kind) {
                if !state.registry().is_live(original) {
                    continue;
                }
                let mut block = original;
                for factory in &factories {
                    let id = factory.dependency_id();
                    let processor = instances
                        .entry(id)
                        .or_insert_with(|| factory.create(state));
                    let new_block = processor.pre_process(state, block);
                    if new_block == block {
                        continue;
                    }
                    replace_block(state, block, new_block, id.name())?;
                    replaced += 1;
                    if state.tree().kind(new_block) != state.tree().kind(block) {
                        break;
                    }
                    block = new_block;
                }
            }
        }
    }
    Ok(replaced)
}

/// Groups a stage's factories by subscribed kind, in first-declared order.
fn factories_by_kind(
    stage: &[Box<dyn BlockPreProcessorFactory>],
) -> Vec<(BlockKind, Vec<&dyn BlockPreProcessorFactory>)> {
    let mut groups: Vec<(BlockKind, Vec<&dyn BlockPreProcessorFactory>)> = Vec::new();
    for factory in stage {
        for kind in factory.block_kinds() {
            match groups.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, group)) => group.push(factory.as_ref()),
                None => groups.push((kind, vec![factory.as_ref()])),
            }
        }
    }
    groups
}

/// Puts `new` where `old` was. `old` loses its parser and leaves every index;
/// `new` becomes live without one.
fn replace_block(
    state: &mut ParserState,
    old: NodeId,
    new: NodeId,
    processor: &'static str,
) -> Result<(), ParseError> {
    let tree = state.tree();
    if !tree.contains(new) || new == tree.root() || tree.parent(new).is_some() {
        return Err(ParseError::BlockNotDetached {
            processor,
            block: new,
        });
    }
    log::trace!("{processor} replaced {old} with {new}");
    state.tree_mut().insert_after(old, new);
    state.block_added(new, None);
    state.remove_block(old);
    Ok(())
}
