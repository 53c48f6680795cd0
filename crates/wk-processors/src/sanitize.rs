use std::borrow::Cow;

use ammonia::Builder as AmmoniaBuilder;
use wk_renderer::{Processor, RenderContext};

/// Allow-list HTML sanitizer.
///
/// Keeps the markup the pipeline itself produces (code blocks, tables,
/// template buttons, task-list checkboxes, emoji and math spans) and strips
/// scripts, event handlers and unsafe URLs. Meant to be the last
/// post-processor.
pub struct Sanitizer {
    builder: AmmoniaBuilder<'static>,
    enabled: bool,
}

impl Sanitizer {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            builder: build_sanitizer(),
            enabled,
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Processor for Sanitizer {
    fn name(&self) -> &str {
        "sanitizer"
    }

    fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
        self.builder.clean(text).to_string()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    builder.add_tags(&["button", "input"]);
    builder.add_generic_attributes(&["class", "id", "role", "aria-label"]);
    builder.add_tag_attributes("img", &["title"]);
    builder.add_tag_attributes("th", &["style"]);
    builder.add_tag_attributes("td", &["style"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder.add_tag_attributes("button", &["type", "data-template", "data-path"]);
    builder.attribute_filter(filter_attribute);
    builder.link_rel(None);

    builder
}

/// Restrict `style` to the table alignments the renderer emits.
fn filter_attribute<'u>(_element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if !attribute.eq_ignore_ascii_case("style") {
        return Some(Cow::Borrowed(value));
    }
    let alignment = value
        .trim()
        .trim_end_matches(';')
        .strip_prefix("text-align:")?
        .trim();
    matches!(alignment, "left" | "center" | "right")
        .then(|| Cow::Owned(format!("text-align:{alignment}")))
}
