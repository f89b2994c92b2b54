use serde::Serialize;

use crate::parsing::{
    Document,
    rope::{Span, preview},
};

use super::describe_attrs;

#[derive(Debug, Serialize)]
pub struct Snap {
    pub blocks: Vec<BlockSnap>,
}

#[derive(Debug, Serialize)]
pub struct BlockSnap {
    pub kind: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<String>,
    /// Source range covered by the block's content lines, if it has any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

/// Every block reachable from the root, in document order.
pub fn normalize(doc: &Document) -> Snap {
    let blocks = doc
        .tree()
        .descendants(doc.root())
        .into_iter()
        .map(|(block, depth)| {
            let node = doc.tree().get(block);
            let lines = node.content.lines();
            let span = lines
                .first()
                .zip(lines.last())
                .map(|(first, last)| Span::new(first.span.start, last.span.end));
            BlockSnap {
                kind: node.kind().to_string(),
                depth,
                attrs: describe_attrs(&node.attrs),
                span: span.map(|sp| (sp.start, sp.end)),
                text: span.map_or_else(String::new, |sp| preview(doc.source(), sp, 80)),
            }
        })
        .collect();
    Snap { blocks }
}
