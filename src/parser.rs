use crate::ast::{FieldPath, PathSegment};
use crate::error::PathError;

/// Parser state: tracks position in the path string.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

/// Parse a dot/bracket field name such as `tasks[0].details.priority` into
/// its segments.
///
/// `.name` introduces a named segment and `[n]` an index segment. A bracket
/// group whose content is not a canonical non-negative integer (`[id]`,
/// `[]`, `[01]`) is kept as a literal named segment. The only failure is an
/// empty input.
pub fn parse(input: &str) -> Result<FieldPath, PathError> {
    if input.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let mut parser = Parser { input, pos: 0 };
    let mut segments = Vec::new();

    // The root is always a mapping, so the first segment is a name even when
    // it is written in brackets.
    if parser.peek_char() == Some('[') {
        match parser.parse_bracket() {
            Some(content) => segments.push(PathSegment::Key(content.to_string())),
            None => {
                let rest = parser.take_rest();
                append_literal(&mut segments, rest);
            }
        }
    } else {
        segments.push(PathSegment::Key(parser.parse_key().to_string()));
    }

    while let Some(ch) = parser.peek_char() {
        match ch {
            '.' => {
                parser.advance(1);
                segments.push(PathSegment::Key(parser.parse_key().to_string()));
            }
            '[' => match parser.parse_bracket() {
                Some(content) => segments.push(bracket_segment(content)),
                None => {
                    let rest = parser.take_rest();
                    append_literal(&mut segments, rest);
                }
            },
            // Text straight after `]`, as in `a[0]b`
            _ => segments.push(PathSegment::Key(parser.parse_key().to_string())),
        }
    }

    Ok(FieldPath::new(segments))
}

impl<'a> Parser<'a> {
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consume a run of name characters, stopping at `.`, `[` or the end.
    fn parse_key(&mut self) -> &'a str {
        let rest = self.remaining();
        let end = rest.find(['.', '[']).unwrap_or(rest.len());
        self.advance(end);
        &rest[..end]
    }

    /// Consume `[content]` and return `content`. Returns `None` without
    /// consuming anything when the bracket is never closed.
    fn parse_bracket(&mut self) -> Option<&'a str> {
        let rest = self.remaining();
        debug_assert!(rest.starts_with('['));
        let close = rest[1..].find(']')?;
        self.advance(close + 2);
        Some(&rest[1..close + 1])
    }

    fn take_rest(&mut self) -> &'a str {
        let rest = self.remaining();
        self.pos = self.input.len();
        rest
    }
}

fn bracket_segment(content: &str) -> PathSegment {
    match parse_index(content) {
        Some(idx) => PathSegment::Index(idx),
        None => PathSegment::Key(content.to_string()),
    }
}

/// An index is `0` or a run of digits without a leading zero that fits in
/// `usize`.
pub(crate) fn parse_index(content: &str) -> Option<usize> {
    let digits = !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit());
    if digits && (content == "0" || !content.starts_with('0')) {
        content.parse().ok()
    } else {
        None
    }
}

/// An unterminated `[` is ordinary text belonging to the preceding name.
fn append_literal(segments: &mut Vec<PathSegment>, text: &str) {
    match segments.last_mut() {
        Some(PathSegment::Key(name)) => name.push_str(text),
        _ => segments.push(PathSegment::Key(text.to_string())),
    }
}
