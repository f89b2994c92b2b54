//! Link reference definitions (`[label]: destination "title"`) at the start
//! of a paragraph.
//!
//! Each recognized definition is stored in the document's [`ReferenceMap`];
//! the first definition of a label wins.

use crate::parsing::{
    blocks::{NodeId, ParserState},
    properties::{ReferenceDefinition, ReferenceMap},
};

use super::{DependencyId, Dependent, ParagraphPreProcessor, ParagraphPreProcessorFactory};

/// Labels longer than this are not labels.
pub const MAX_LABEL_LEN: usize = 999;

/// Parenthesis nesting limit within an unbracketed destination.
const MAX_PAREN_DEPTH: usize = 32;

#[derive(Debug, Default)]
pub struct ReferencePreProcessorFactory;

impl Dependent for ReferencePreProcessorFactory {
    fn dependency_id(&self) -> DependencyId {
        DependencyId::of::<Self>()
    }
}

impl ParagraphPreProcessorFactory for ReferencePreProcessorFactory {
    fn create(&self, _state: &ParserState) -> Box<dyn ParagraphPreProcessor> {
        Box::new(ReferencePreProcessor)
    }
}

/// Consumes every consecutive definition at the start of a paragraph.
#[derive(Debug, Default)]
pub struct ReferencePreProcessor;

impl ParagraphPreProcessor for ReferencePreProcessor {
    fn pre_process_block(&mut self, paragraph: NodeId, state: &mut ParserState) -> usize {
        let text = state.block_text(paragraph);
        let mut pos = 0;
        while let Some((len, definition)) = parse_definition(&text[pos..]) {
            log::trace!("reference definition [{}] in {paragraph}", definition.label);
            state
                .properties_mut()
                .get_or_default::<ReferenceMap>()
                .insert(definition);
            pos += len;
        }
        pos
    }
}

fn skip_spaces(b: &[u8], mut i: usize) -> usize {
    while matches!(b.get(i), Some(b' ' | b'\t')) {
        i += 1;
    }
    i
}

fn line_ending_len(b: &[u8], i: usize) -> usize {
    match (b.get(i), b.get(i + 1)) {
        (Some(b'\r'), Some(b'\n')) => 2,
        (Some(b'\n' | b'\r'), _) => 1,
        _ => 0,
    }
}

fn at_line_end(b: &[u8], i: usize) -> bool {
    i == b.len() || line_ending_len(b, i) > 0
}

/// Skips spaces and tabs with at most one line ending among them.
fn skip_whitespace(b: &[u8], i: usize) -> usize {
    let i = skip_spaces(b, i);
    match line_ending_len(b, i) {
        0 => i,
        n => skip_spaces(b, i + n),
    }
}

/// Removes backslash escapes before ASCII punctuation.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek().is_some_and(char::is_ascii_punctuation) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Parses one definition at the start of `s`, preceded by optional spaces.
/// Returns the bytes consumed, including the trailing line ending.
pub fn parse_definition(s: &str) -> Option<(usize, ReferenceDefinition)> {
    let b = s.as_bytes();
    let mut i = skip_spaces(b, 0);
    if b.get(i) != Some(&b'[') {
        return None;
    }

    let label_start = i + 1;
    i = label_start;
    loop {
        match *b.get(i)? {
            b'\\' => i += if b.get(i + 1).is_some() { 2 } else { 1 },
            b'[' => return None,
            b']' => break,
            _ => i += 1,
        }
    }
    let label = &s[label_start..i];
    if label.len() > MAX_LABEL_LEN || label.trim().is_empty() {
        return None;
    }
    i += 1;
    if b.get(i) != Some(&b':') {
        return None;
    }

    let (destination, after_destination) = parse_destination(s, skip_whitespace(b, i + 1))?;

    let mut title = None;
    let mut end = None;
    let title_start = skip_whitespace(b, after_destination);
    if title_start > after_destination {
        if let Some((parsed, after_title)) = parse_title(s, title_start) {
            let j = skip_spaces(b, after_title);
            if at_line_end(b, j) {
                title = Some(parsed);
                end = Some(j);
            }
        }
    }
    let end = match end {
        Some(end) => end,
        None => {
            // a title that does not end its line is not part of the definition
            let j = skip_spaces(b, after_destination);
            if !at_line_end(b, j) {
                return None;
            }
            j
        }
    };

    Some((
        end + line_ending_len(b, end),
        ReferenceDefinition {
            label: label.to_string(),
            destination,
            title,
        },
    ))
}

fn parse_destination(s: &str, start: usize) -> Option<(String, usize)> {
    let b = s.as_bytes();
    if b.get(start) == Some(&b'<') {
        let mut i = start + 1;
        loop {
            match *b.get(i)? {
                b'>' => break,
                b'\n' | b'\r' | b'<' => return None,
                b'\\' => i += if b.get(i + 1).is_some() { 2 } else { 1 },
                _ => i += 1,
            }
        }
        return Some((unescape(&s[start + 1..i]), i + 1));
    }

    let mut i = start;
    let mut depth = 0usize;
    while let Some(&c) = b.get(i) {
        match c {
            0..=b' ' | 0x7f => break,
            b'\\' if b.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 1,
            b'(' => {
                depth += 1;
                if depth > MAX_PAREN_DEPTH {
                    return None;
                }
            }
            b')' if depth == 0 => break,
            b')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    if i == start || depth != 0 {
        return None;
    }
    Some((unescape(&s[start..i]), i))
}

fn parse_title(s: &str, start: usize) -> Option<(String, usize)> {
    let b = s.as_bytes();
    let closer = match *b.get(start)? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = start + 1;
    loop {
        let c = *b.get(i)?;
        if c == closer {
            break;
        }
        match c {
            b'(' if closer == b')' => return None,
            b'\\' => i += if b.get(i + 1).is_some() { 2 } else { 1 },
            b'\n' | b'\r' => {
                let next = i + line_ending_len(b, i);
                let after = skip_spaces(b, next);
                if at_line_end(b, after) {
                    // titles cannot contain a blank line
                    return None;
                }
                i = next;
            }
            _ => i += 1,
        }
    }
    Some((unescape(&s[start + 1..i]), i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn definition(label: &str, destination: &str, title: Option<&str>) -> ReferenceDefinition {
        ReferenceDefinition {
            label: label.to_string(),
            destination: destination.to_string(),
            title: title.map(str::to_string),
        }
    }

    #[rstest]
    #[case("[foo]: /url \"title\"", 19, definition("foo", "/url", Some("title")))]
    #[case("[foo]: /url\nbar", 12, definition("foo", "/url", None))]
    #[case("   [Foo Bar]:\n<my url>\n'the title'\n", 35, definition("Foo Bar", "my url", Some("the title")))]
    #[case("[a]: /u (paren title)\r\n", 23, definition("a", "/u", Some("paren title")))]
    #[case("[b\\]c]: /x\\*y", 13, definition("b\\]c", "/x*y", None))]
    #[case("[t]: /u \"multi\nline\"\n", 21, definition("t", "/u", Some("multi\nline")))]
    #[case("[p]: /a(b(c))d", 14, definition("p", "/a(b(c))d", None))]
    fn parses_definitions(
        #[case] input: &str,
        #[case] consumed: usize,
        #[case] expected: ReferenceDefinition,
    ) {
        assert_eq!(parse_definition(input), Some((consumed, expected)));
    }

    #[rstest]
    #[case("[foo] /url")]
    #[case("[]: /url")]
    #[case("[foo]:")]
    #[case("[foo]: /url \"title\" junk")]
    #[case("[foo]: <bad\nurl>")]
    #[case("[a[b]]: /url")]
    #[case("[foo]: /url \"unterminated\n\nrest\"")]
    #[case("[foo]: /url(")]
    #[case("text [foo]: /url")]
    fn rejects_non_definitions(#[case] input: &str) {
        assert_eq!(parse_definition(input), None);
    }

    #[test]
    fn title_on_next_line_falls_back_to_no_title_when_trailing_text_follows() {
        let input = "[foo]: /url\n\"title\" ok\n";
        assert_eq!(
            parse_definition(input),
            Some((12, definition("foo", "/url", None)))
        );
    }

    #[test]
    fn unescape_only_strips_escapes_before_punctuation() {
        assert_eq!(unescape(r"a\*b\c\\"), r"a*b\c\");
    }
}
