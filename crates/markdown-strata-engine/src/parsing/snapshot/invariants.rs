use crate::parsing::{Document, blocks::BlockKind};

/// Panics if the document breaks a structural invariant.
pub fn check(doc: &Document) {
    let tree = doc.tree();
    let len = doc.source().len();

    assert_eq!(tree.kind(doc.root()), BlockKind::Document, "root is not a document");
    assert_eq!(tree.parent(doc.root()), None, "root has a parent");

    for (block, _) in tree.descendants(doc.root()) {
        let node = tree.get(block);
        for &child in node.children() {
            assert_eq!(
                tree.parent(child),
                Some(block),
                "{child} is listed under {block} but links elsewhere"
            );
        }

        for line in node.content.lines() {
            assert!(
                line.span.start <= line.span.end && line.span.end <= len,
                "content span out of bounds: {:?} (rope len: {len})",
                line.span
            );
        }

        match node.kind() {
            BlockKind::Document | BlockKind::BlockQuote | BlockKind::ListBlock | BlockKind::ListItem => {
                assert!(node.content.is_empty(), "container {block} has content");
            }
            _ => {}
        }
        if node.kind() == BlockKind::ListBlock {
            assert!(
                node.children()
                    .iter()
                    .all(|&c| tree.kind(c) == BlockKind::ListItem),
                "list {block} holds a non-item"
            );
        }
        if node.kind() == BlockKind::ListItem {
            assert_eq!(
                node.parent().map(|p| tree.kind(p)),
                Some(BlockKind::ListBlock),
                "item {block} outside a list"
            );
        }
    }
}
