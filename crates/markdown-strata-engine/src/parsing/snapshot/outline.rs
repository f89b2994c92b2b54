use std::fmt::Write;

use crate::parsing::Document;

use super::describe_attrs;

/// Renders the block tree as indented lines: kind, attributes in
/// parentheses, then the content lines of leaf blocks.
///
/// ```text
/// Document
///   BlockQuote
///     Paragraph ["a", "b"]
/// ```
pub fn outline(doc: &Document) -> String {
    let mut out = String::new();
    for (block, depth) in doc.tree().descendants(doc.root()) {
        let node = doc.tree().get(block);
        let _ = write!(out, "{}{}", "  ".repeat(depth), node.kind());
        if let Some(attrs) = describe_attrs(&node.attrs) {
            let _ = write!(out, "({attrs})");
        }
        if !node.content.is_empty() {
            let _ = write!(out, " {:?}", doc.lines_of(block));
        }
        out.push('\n');
    }
    out
}
