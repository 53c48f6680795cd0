use std::sync::LazyLock;

use regex::Regex;
use wk_renderer::source::map_lines_outside_code;
use wk_renderer::{Processor, RenderContext, escape_html};

use crate::inline::map_outside_code_spans;

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"'()\[\]]+\.(?:png|jpe?g|gif|svg|webp)"#).unwrap()
});

/// Expands bare image URLs into inline images.
///
/// A URL counts as bare when it stands on its own: at the start of a line or
/// after whitespace, and followed by whitespace or the end of the line. URLs
/// inside markdown links, HTML attributes, code spans or code blocks are not
/// expanded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageExpander;

impl Processor for ImageExpander {
    fn name(&self) -> &str {
        "image-expander"
    }

    fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
        map_lines_outside_code(text, |line| map_outside_code_spans(line, expand_segment))
    }
}

fn expand_segment(segment: &str) -> String {
    let mut output = String::with_capacity(segment.len());
    let mut last = 0;

    for url in IMAGE_URL.find_iter(segment) {
        let before = segment[..url.start()].chars().next_back();
        let after = segment[url.end()..].chars().next();
        let standalone = before.is_none_or(char::is_whitespace)
            && after.is_none_or(char::is_whitespace);
        if !standalone {
            continue;
        }

        let src = escape_html(url.as_str());
        output.push_str(&segment[last..url.start()]);
        output.push_str(&format!(
            r#"<a href="{src}"><img src="{src}" class="auto-expanded-image"></a>"#
        ));
        last = url.end();
    }

    output.push_str(&segment[last..]);
    output
}
