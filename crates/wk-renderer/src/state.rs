//! State structs tracked while walking markdown events.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

/// Fenced or indented code collected until the block closes.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    /// Language tag of current code block (e.g., "js", "tsv-h", "js:Main").
    language: Option<String>,
    /// Raw code, passed to the dispatcher unescaped.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language tag.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// Close the block, handing back its tag and code.
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// Position inside a GFM table, for cell alignment.
#[derive(Default)]
pub(crate) struct TableState {
    /// Inside `<thead>`, so cells render as `<th>`.
    in_head: bool,
    alignments: Vec<Alignment>,
    /// Zero-based column of the cell being rendered.
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Inline `style` attribute for the current cell, or empty.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Alt text gathered from the events between image start and end.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Heading being rendered plus the ids already handed out on this page.
#[derive(Default)]
pub(crate) struct HeadingState {
    /// Level of the open heading.
    current_level: Option<u8>,
    /// Plain text of the heading, used for the slug.
    text: String,
    /// Heading HTML (with inline formatting).
    html: String,
    /// Next suffix to try for each slug.
    id_counts: HashMap<String, usize>,
    /// Every id handed out so far.
    used_ids: HashSet<String>,
}

impl HeadingState {
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the heading and return (level, id, html).
    pub(crate) fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let id = self.generate_id(&text);
        Some((level, id, html))
    }

    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id.push_str("section");
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        loop {
            let candidate = match *count {
                0 => base_id.clone(),
                n => format!("{base_id}-{n}"),
            };
            *count += 1;
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }
}

/// Convert text to a URL-safe slug.
///
/// Lowercases, keeps alphanumeric characters (including non-Latin letters,
/// since page titles are often Japanese), collapses whitespace, dashes and
/// underscores into single dashes, and drops everything else.
///
/// ```
/// use wk_renderer::slugify;
///
/// assert_eq!(slugify("What's New?"), "whats-new");
/// assert_eq!(slugify("議事録 2024"), "議事録-2024");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut after_dash = true;

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            after_dash = false;
        } else if !after_dash && (c.is_whitespace() || matches!(c, '-' | '_')) {
            result.push('-');
            after_dash = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }
    result
}

/// Escape HTML-significant characters.
///
/// `&`, `<` and `>` are always escaped; `"` and `'` only when
/// `escape_quotes` is set (required inside attribute values).
///
/// ```
/// use wk_renderer::escape;
///
/// assert_eq!(escape(r#"<a href="x">"#, true), "&lt;a href=&quot;x&quot;&gt;");
/// assert_eq!(escape(r#"say "hi""#, false), r#"say "hi""#);
/// ```
#[must_use]
pub fn escape(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape all five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    escape(text, true)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Meeting Notes"), "meeting-notes");
        assert_eq!(slugify("  Q&A (draft)  "), "qa-draft");
        assert_eq!(slugify("release -- plan"), "release-plan");
        assert_eq!(slugify("team_wiki"), "team-wiki");
        assert_eq!(slugify("trailing-"), "trailing");
    }

    #[test]
    fn test_slugify_non_latin() {
        assert_eq!(slugify("週報 第3回"), "週報-第3回");
        assert_eq!(slugify("Ünïcödé"), "ünïcödé");
    }

    #[test]
    fn test_escape_with_quotes() {
        assert_eq!(escape("<script>", true), "&lt;script&gt;");
        assert_eq!(escape("a & b", true), "a &amp; b");
        assert_eq!(escape(r#""quoted""#, true), "&quot;quoted&quot;");
        assert_eq!(escape("it's", true), "it&#39;s");
    }

    #[test]
    fn test_escape_without_quotes() {
        assert_eq!(escape(r#"<"it's">"#, false), r#"&lt;"it's"&gt;"#);
    }

    #[test]
    fn test_escape_html_escapes_quotes() {
        assert_eq!(escape_html(r#"a="b""#), "a=&quot;b&quot;");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("js".to_owned()));
        assert!(state.is_active());

        state.push_str("alert(1)");
        state.push_newline();
        let (lang, content) = state.end();
        assert_eq!(lang, Some("js".to_owned()));
        assert_eq!(content, "alert(1)\n");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::Center, Alignment::Right]);

        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:left""#
        );

        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:center""#
        );

        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:right""#
        );

        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");

        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        state.start();
        assert!(state.is_active());
        state.push_str("org chart");
        assert_eq!(state.end(), "org chart");
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let mut state = HeadingState::default();
        let mut ids = Vec::new();
        for _ in 0..3 {
            state.start_heading(2);
            state.push_text("FAQ");
            let (_, id, _) = state.complete_heading().unwrap();
            ids.push(id);
        }
        assert_eq!(ids, vec!["faq", "faq-1", "faq-2"]);
    }

    #[test]
    fn test_heading_ids_skip_taken_suffixes() {
        let mut state = HeadingState::default();
        let ids: Vec<String> = ["FAQ", "FAQ 1", "FAQ", "FAQ-1"]
            .into_iter()
            .map(|text| {
                state.start_heading(2);
                state.push_text(text);
                state.complete_heading().unwrap().1
            })
            .collect();
        assert_eq!(ids, vec!["faq", "faq-1", "faq-2", "faq-1-1"]);
    }

    #[test]
    fn test_heading_without_slug_characters() {
        let mut state = HeadingState::default();
        state.start_heading(1);
        state.push_text("???");
        let (level, id, _) = state.complete_heading().unwrap();
        assert_eq!(level, 1);
        assert_eq!(id, "section");
    }

    #[test]
    fn test_complete_heading_outside_heading() {
        let mut state = HeadingState::default();
        assert!(state.complete_heading().is_none());
    }
}
