use xi_rope::Rope;

use super::span::Span;

/// A single physical line of the source with its end-of-line marker split off.
#[derive(Debug, Clone, Default)]
pub struct LineRef {
    /// Zero-based line number.
    pub number: usize,
    /// Byte span of the line content, excluding the EOL marker.
    pub span: Span,
    /// Byte span of the EOL marker (`\n`, `\r\n`, or empty for a final unterminated line).
    pub eol: Span,
    /// The line text including its EOL marker.
    pub text: String,
}

impl LineRef {
    /// The line text without the EOL marker.
    pub fn content(&self) -> &str {
        &self.text[..self.span.len()]
    }

    /// Byte span of the whole line including the EOL marker.
    pub fn full_span(&self) -> Span {
        Span::new(self.span.start, self.eol.end)
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Lines break at `\n`; a `\r` directly before the `\n` is part of the EOL
/// marker. A lone `\r` is ordinary line content. A final line without a
/// terminator is still produced, an empty input produces no lines.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(number, line)| {
        let start = offset;
        let len = line.len();
        offset += len;

        let eol_len = if line.ends_with("\r\n") {
            2
        } else if line.ends_with('\n') {
            1
        } else {
            0
        };

        LineRef {
            number,
            span: Span::new(start, offset - eol_len),
            eol: Span::new(offset - eol_len, offset),
            text: line.into_owned(),
        }
    })
}
