use std::sync::LazyLock;

use regex::{Captures, Regex};
use wk_renderer::source::map_lines_outside_code;
use wk_renderer::{Processor, RenderContext};

use crate::inline::map_outside_code_spans;

/// `</page/path>`, optionally escaped with a backslash.
static ANGLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\?<(/[^<>\n]+?)>").unwrap());

/// `[/page/path]`, optionally escaped with a backslash.
static SQUARE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\?\[(/[^\[\]\n]+?)\]").unwrap());

/// Turns wiki page references into markdown links.
///
/// - `</user/alice/memo>` → `[/user/alice/memo](/user/alice/memo)`
/// - `[/user/alice/memo]` → `[/user/alice/memo](/user/alice/memo)`
///
/// A reference preceded by a backslash is left as written. `</word>` with a
/// single bare word is an HTML closing tag, not a page reference. Bracketed
/// paths followed by `(`, `[` or `:` already are links or link definitions.
/// Code blocks and inline code spans are not rewritten.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linker;

impl Processor for Linker {
    fn name(&self) -> &str {
        "linker"
    }

    fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
        map_lines_outside_code(text, |line| map_outside_code_spans(line, link_segment))
    }
}

fn link_segment(segment: &str) -> String {
    let angled = ANGLE_LINK.replace_all(segment, |caps: &Captures| {
        let whole = caps.get(0).unwrap();
        let path = &caps[1];
        let escaped = whole.as_str().starts_with('\\');
        let in_destination = segment[..whole.start()].ends_with('(');
        if escaped || in_destination || is_closing_tag(path) {
            whole.as_str().to_owned()
        } else {
            page_link(path)
        }
    });

    SQUARE_LINK
        .replace_all(&angled, |caps: &Captures| {
            let whole = caps.get(0).unwrap();
            let path = &caps[1];
            let escaped = whole.as_str().starts_with('\\');
            let followed = angled[whole.end()..].starts_with(['(', '[', ':']);
            if escaped || followed {
                whole.as_str().to_owned()
            } else {
                page_link(path)
            }
        })
        .into_owned()
}

/// `/div`, `/span `: a closing tag rather than a page path.
fn is_closing_tag(path: &str) -> bool {
    let name = path[1..].trim_end();
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn page_link(path: &str) -> String {
    if path.contains(char::is_whitespace) {
        format!("[{path}](<{path}>)")
    } else {
        format!("[{path}]({path})")
    }
}
