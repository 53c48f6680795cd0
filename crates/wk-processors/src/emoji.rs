use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use wk_renderer::{Processor, RenderContext};

use crate::html::map_text_nodes;

static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z0-9_+\-]+):").unwrap());

/// Replaces GitHub-style `:shortcode:` with emoji.
///
/// Only text nodes are rewritten, never attributes or code. Unknown
/// shortcodes stay as written.
#[derive(Clone, Copy, Debug)]
pub struct Emoji {
    enabled: bool,
}

impl Emoji {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for Emoji {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Processor for Emoji {
    fn name(&self) -> &str {
        "emoji"
    }

    fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
        map_text_nodes(text, replace_shortcodes)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

fn replace_shortcodes(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(caps) = SHORTCODE.captures_at(text, pos) {
        let whole = caps.get(0).unwrap();
        let name = &caps[1];
        match emojis::get_by_shortcode(name) {
            Some(emoji) => {
                output.push_str(&text[last..whole.start()]);
                write!(
                    output,
                    r#"<span class="emoji" role="img" aria-label="{name}">{}</span>"#,
                    emoji.as_str()
                )
                .unwrap();
                last = whole.end();
                pos = whole.end();
            }
            // The closing colon may open the next shortcode
            None => pos = whole.end() - 1,
        }
    }

    output.push_str(&text[last..]);
    output
}
