use serde::{Deserialize, Serialize};

/// Switches for the core block parsers.
///
/// Every field defaults to `true`; a missing field in a config file keeps
/// the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub block_quotes: bool,
    pub headings: bool,
    pub fenced_code_blocks: bool,
    pub html_blocks: bool,
    pub thematic_breaks: bool,
    pub lists: bool,
    pub indented_code_blocks: bool,
    /// Consume link reference definitions at the start of paragraphs.
    pub reference_definitions: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            block_quotes: true,
            headings: true,
            fenced_code_blocks: true,
            html_blocks: true,
            thematic_breaks: true,
            lists: true,
            indented_code_blocks: true,
            reference_definitions: true,
        }
    }
}
