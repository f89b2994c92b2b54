use std::fmt;

use serde::Serialize;

/// Stable identifier of a block in the [`BlockTree`](super::tree::BlockTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind tag of a block node.
///
/// Core kinds form a closed set; extensions name their own kinds with
/// [`BlockKind::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    Document,
    BlockQuote,
    Heading,
    Paragraph,
    ListBlock,
    ListItem,
    FencedCodeBlock,
    IndentedCodeBlock,
    HtmlBlock,
    ThematicBreak,
    Custom(&'static str),
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Custom(name) => f.write_str(name),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Bullet or ordered list marker shared by a list and its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    /// `-`, `+` or `*`.
    Bullet(char),
    /// A number followed by `.` or `)`.
    Ordered { start: u32, delimiter: char },
}

impl ListMarker {
    /// Two markers belong to the same list when type, bullet char and delimiter agree.
    pub fn same_list(self, other: ListMarker) -> bool {
        match (self, other) {
            (ListMarker::Bullet(a), ListMarker::Bullet(b)) => a == b,
            (
                ListMarker::Ordered { delimiter: a, .. },
                ListMarker::Ordered { delimiter: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// Kind-specific data carried by a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum BlockAttrs {
    #[default]
    None,
    Heading {
        level: u8,
        setext: bool,
    },
    List {
        marker: ListMarker,
        tight: bool,
    },
    ListItem {
        marker: ListMarker,
        marker_offset: usize,
        padding: usize,
    },
    FencedCode {
        fence_char: char,
        fence_len: usize,
        fence_indent: usize,
        info: String,
    },
    Html {
        condition: u8,
    },
}
