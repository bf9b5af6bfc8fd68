//! Helpers shared by the line-oriented updaters

/// Characters of `line` outside double-quoted string literals, with their
/// byte offsets. The opening quote of each literal is kept.
pub(crate) fn code_chars(line: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_string = false;
    let mut escaped = false;

    line.char_indices().filter(move |&(_, c)| {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            return false;
        }

        if c == '"' {
            in_string = true;
        }
        true
    })
}

/// Net count of `open` minus `close` characters in `line`, ignoring anything
/// inside double-quoted string literals.
pub(crate) fn depth_delta(line: &str, open: char, close: char) -> i32 {
    code_chars(line)
        .map(|(_, c)| match c {
            c if c == open => 1,
            c if c == close => -1,
            _ => 0,
        })
        .sum()
}

pub(crate) fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start().len();
    &line[..end]
}

/// `"\r"` when the document uses CRLF line endings, so rendered lines can
/// carry the same terminator once joined with `\n`
pub(crate) fn carriage_return(content: &str) -> &'static str {
    if content.contains("\r\n") { "\r" } else { "" }
}
