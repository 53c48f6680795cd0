use std::sync::LazyLock;

use regex::{Captures, Regex};
use wk_renderer::{Processor, RenderContext};

use crate::html::map_text_runs;

static DISPLAY_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^<br\s*/?>$").unwrap());

/// Marks `$$…$$` formulas for client-side typesetting.
///
/// `$$x^2$$` becomes `<span class="wiki-math">\[x^2\]</span>`. A formula
/// lives in text: it may span the `<br>` the markdown renderer inserts for
/// line breaks (those are removed) but no other tag, and attribute values
/// are never rewritten. Disabled by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Math {
    enabled: bool,
}

impl Math {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Processor for Math {
    fn name(&self) -> &str {
        "math"
    }

    fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
        map_text_runs(
            text,
            |tag| BREAK_TAG.is_match(tag),
            |run| {
                DISPLAY_MATH
                    .replace_all(run, |caps: &Captures| {
                        let formula = LINE_BREAK.replace_all(&caps[1], "");
                        format!(r#"<span class="wiki-math">\[{formula}\]</span>"#)
                    })
                    .into_owned()
            },
        )
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
