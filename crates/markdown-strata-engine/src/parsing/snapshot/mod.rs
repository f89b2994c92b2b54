//! # Snapshot Support
//!
//! Stable renderings of a parsed [`Document`](crate::parsing::Document) for
//! snapshot tests and tooling.
//!
//! ## Modules
//!
//! - **`outline`**: indented text tree, one block per line
//! - **`normalize`**: serializable `Snap` of every block in document order
//! - **`invariants`**: structural checks every parse must satisfy (links
//!   consistent, spans in bounds, containers without content)
//!
//! Parsing behavior is pinned down by snapshot tests over these renderings
//! rather than by a separate formal grammar.

pub mod invariants;
pub mod normalize;
pub mod outline;

pub use invariants::check as invariants;
pub use normalize::{BlockSnap, Snap, normalize};
pub use outline::outline;

use crate::parsing::blocks::{BlockAttrs, ListMarker};

/// Short description of kind-specific attributes, `None` when there are none.
pub fn describe_attrs(attrs: &BlockAttrs) -> Option<String> {
    match attrs {
        BlockAttrs::None | BlockAttrs::ListItem { .. } => None,
        BlockAttrs::Heading { level, setext } => Some(if *setext {
            format!("h{level}, setext")
        } else {
            format!("h{level}")
        }),
        BlockAttrs::List { marker, tight } => {
            let spacing = if *tight { "tight" } else { "loose" };
            Some(match marker {
                ListMarker::Bullet(c) => format!("bullet {c}, {spacing}"),
                ListMarker::Ordered { start, delimiter } => {
                    format!("ordered {start}{delimiter}, {spacing}")
                }
            })
        }
        BlockAttrs::FencedCode { info, .. } => (!info.is_empty()).then(|| info.clone()),
        BlockAttrs::Html { condition } => Some(format!("condition {condition}")),
    }
}
