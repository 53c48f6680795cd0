//! Code-aware helpers for processors that rewrite markdown source.
//!
//! Pre-processors work on raw text and must leave code blocks alone. Code
//! blocks are located with the same parser the renderer uses, so fences
//! nested in blockquotes or list items and indented code are recognized
//! exactly as they will be rendered.

use std::ops::Range;

use pulldown_cmark::{Event, Parser, Tag};

/// Byte ranges of every code block (fenced or indented) in `markdown`.
///
/// Ranges are sorted and do not overlap. A fence left open runs to the end
/// of the input.
#[must_use]
pub fn code_block_ranges(markdown: &str) -> Vec<Range<usize>> {
    Parser::new(markdown)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

/// Apply `transform` to every line that is not part of a code block.
///
/// Lines are passed without their line terminator. Terminators, and lines
/// touching a code block (fence markers and container prefixes such as `> `
/// included), are copied through unchanged.
///
/// ```
/// use wk_renderer::source::map_lines_outside_code;
///
/// let out = map_lines_outside_code("a\n```\na\n```\na", str::to_uppercase);
/// assert_eq!(out, "A\n```\na\n```\nA");
/// ```
pub fn map_lines_outside_code<F>(input: &str, mut transform: F) -> String
where
    F: FnMut(&str) -> String,
{
    let code = code_block_ranges(input);
    let mut code = code.iter().peekable();
    let mut output = String::with_capacity(input.len());
    let mut start = 0;

    for line in input.split_inclusive('\n') {
        let end = start + line.len();
        while code.next_if(|range| range.end <= start).is_some() {}
        let in_code = code.peek().is_some_and(|range| range.start < end);

        if in_code {
            output.push_str(line);
        } else {
            let (content, ending) = split_line_ending(line);
            output.push_str(&transform(content));
            output.push_str(ending);
        }
        start = end;
    }

    output
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}
