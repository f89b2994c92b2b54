use std::fmt;

use serde::Serialize;

/// Where a document parse currently is.
///
/// Phases only move forward: `NotStarted → Starting → ParseBlocks →
/// PreProcessParagraphs → PreProcessBlocks → ParseInlines → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ParserPhase {
    NotStarted,
    Starting,
    ParseBlocks,
    PreProcessParagraphs,
    PreProcessBlocks,
    ParseInlines,
    Done,
}

impl fmt::Display for ParserPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParserPhase::NotStarted => "NOT_STARTED",
            ParserPhase::Starting => "STARTING",
            ParserPhase::ParseBlocks => "PARSE_BLOCKS",
            ParserPhase::PreProcessParagraphs => "PRE_PROCESS_PARAGRAPHS",
            ParserPhase::PreProcessBlocks => "PRE_PROCESS_BLOCKS",
            ParserPhase::ParseInlines => "PARSE_INLINES",
            ParserPhase::Done => "DONE",
        };
        f.write_str(name)
    }
}
