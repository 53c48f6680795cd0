//! Routing of code blocks to language processors or the highlighter.

use std::collections::HashMap;

use crate::code_block::{LanguageProcessor, LanguageTag};
use crate::highlight::Highlighter;
use crate::state::escape_html;

/// Code-block dispatcher.
///
/// Given a block's code and language tag:
/// - no tag (or an empty one): escaped code in a plain `wiki-code` block
/// - language registered: the processor's output, verbatim
/// - otherwise: highlighter output, or escaped code when highlighting fails,
///   in a `wiki-code wiki-lang` block with a `<cite>` for the function part
///
/// # Example
///
/// ```
/// use wk_renderer::{CodeDispatcher, NoopHighlighter};
///
/// let dispatcher = CodeDispatcher::new(Box::new(NoopHighlighter));
/// assert_eq!(
///     dispatcher.render("a < b", Some("js:Compare")),
///     r#"<pre class="wiki-code wiki-lang"><cite>Compare</cite><code class="lang-js">a &lt; b</code></pre>"#
/// );
/// ```
pub struct CodeDispatcher {
    languages: HashMap<String, Box<dyn LanguageProcessor>>,
    highlighter: Box<dyn Highlighter>,
}

impl CodeDispatcher {
    /// Create a dispatcher with no language processors.
    #[must_use]
    pub fn new(highlighter: Box<dyn Highlighter>) -> Self {
        Self {
            languages: HashMap::new(),
            highlighter,
        }
    }

    /// Register a language processor under an exact language key.
    ///
    /// A later registration for the same key replaces the earlier one.
    pub fn register(&mut self, key: impl Into<String>, processor: Box<dyn LanguageProcessor>) {
        self.languages.insert(key.into(), processor);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with_language<P: LanguageProcessor + 'static>(
        mut self,
        key: impl Into<String>,
        processor: P,
    ) -> Self {
        self.register(key, Box::new(processor));
        self
    }

    /// Registered language keys, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Render one code block.
    pub fn render(&self, code: &str, lang_tag: Option<&str>) -> String {
        let Some(raw) = lang_tag.filter(|tag| !tag.is_empty()) else {
            return format!(r#"<pre class="wiki-code"><code>{}</code></pre>"#, escape_html(code));
        };

        let tag = LanguageTag::parse(raw);
        if let Some(processor) = self.languages.get(tag.language) {
            return processor.process(code, tag.raw);
        }

        let body = match self.highlighter.highlight(tag.language, code) {
            Ok(highlighted) => highlighted,
            Err(err) => {
                tracing::debug!(language = tag.language, error = %err, "Highlighting skipped");
                escape_html(code)
            }
        };

        let cite = tag
            .function
            .map(|function| format!("<cite>{}</cite>", escape_html(function)))
            .unwrap_or_default();

        format!(
            r#"<pre class="wiki-code wiki-lang">{cite}<code class="lang-{}">{body}</code></pre>"#,
            escape_html(tag.language)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::highlight::{HighlightError, NoopHighlighter};

    /// Highlighter that only knows `js` and wraps it in a marker span.
    struct JsOnly;

    impl Highlighter for JsOnly {
        fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
            if language == "js" {
                Ok(format!("<span class=\"hl\">{}</span>", escape_html(code)))
            } else {
                Err(HighlightError::UnsupportedLanguage(language.to_owned()))
            }
        }
    }

    /// Highlighter whose grammar rejects any block containing `!`.
    struct StrictJs;

    impl Highlighter for StrictJs {
        fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
            if code.contains('!') {
                return Err(HighlightError::Syntax {
                    language: language.to_owned(),
                    message: "unexpected `!`".to_owned(),
                });
            }
            Ok(format!("<span class=\"hl\">{}</span>", escape_html(code)))
        }
    }

    struct Verbatim;

    impl LanguageProcessor for Verbatim {
        fn process(&self, code: &str, lang_tag: &str) -> String {
            format!("<table data-tag=\"{lang_tag}\">{code}</table>")
        }
    }

    struct CountingProcessor(Arc<AtomicUsize>);

    impl LanguageProcessor for CountingProcessor {
        fn process(&self, _code: &str, _lang_tag: &str) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            String::new()
        }
    }

    fn dispatcher() -> CodeDispatcher {
        CodeDispatcher::new(Box::new(JsOnly)).with_language("tsv-h", Verbatim)
    }

    #[test]
    fn test_no_language() {
        assert_eq!(
            dispatcher().render("<b>&</b>\n", None),
            "<pre class=\"wiki-code\"><code>&lt;b&gt;&amp;&lt;/b&gt;\n</code></pre>"
        );
    }

    #[test]
    fn test_empty_language_is_no_language() {
        let counter = Arc::new(AtomicUsize::new(0));
        let dispatcher = CodeDispatcher::new(Box::new(JsOnly))
            .with_language("", CountingProcessor(Arc::clone(&counter)));

        assert_eq!(
            dispatcher.render("x", Some("")),
            r#"<pre class="wiki-code"><code>x</code></pre>"#
        );
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_highlighted_language() {
        assert_eq!(
            dispatcher().render("a<b", Some("js")),
            r#"<pre class="wiki-code wiki-lang"><code class="lang-js"><span class="hl">a&lt;b</span></code></pre>"#
        );
    }

    #[test]
    fn test_unknown_language_falls_back_to_escaped_code() {
        assert_eq!(
            dispatcher().render("a<b", Some("cobol")),
            r#"<pre class="wiki-code wiki-lang"><code class="lang-cobol">a&lt;b</code></pre>"#
        );
    }

    #[test]
    fn test_grammar_failure_falls_back_to_escaped_code() {
        let dispatcher = CodeDispatcher::new(Box::new(StrictJs));
        assert_eq!(
            dispatcher.render("!a<b", Some("js:Main")),
            r#"<pre class="wiki-code wiki-lang"><cite>Main</cite><code class="lang-js">!a&lt;b</code></pre>"#
        );
        assert_eq!(
            dispatcher.render("a<b", Some("js")),
            r#"<pre class="wiki-code wiki-lang"><code class="lang-js"><span class="hl">a&lt;b</span></code></pre>"#
        );
    }

    #[test]
    fn test_function_part_renders_cite() {
        let html = dispatcher().render("x", Some("js:MyDiagram"));
        assert!(html.starts_with(
            r#"<pre class="wiki-code wiki-lang"><cite>MyDiagram</cite><code class="lang-js">"#
        ));
    }

    #[test]
    fn test_cite_is_escaped() {
        let html = dispatcher().render("x", Some("cobol:<i>"));
        assert!(html.contains("<cite>&lt;i&gt;</cite>"));
    }

    #[test]
    fn test_registered_language_is_verbatim() {
        assert_eq!(
            dispatcher().render("<raw>", Some("tsv-h")),
            r#"<table data-tag="tsv-h"><raw></table>"#
        );
    }

    #[test]
    fn test_registered_language_receives_full_tag() {
        assert_eq!(
            dispatcher().render("c", Some("tsv-h:Members")),
            r#"<table data-tag="tsv-h:Members">c</table>"#
        );
    }

    #[test]
    fn test_registry_match_is_exact() {
        let html = dispatcher().render("c", Some("tsv"));
        assert!(html.contains(r#"class="lang-tsv""#));
    }

    #[test]
    fn test_language_class_is_escaped() {
        let html = CodeDispatcher::new(Box::new(NoopHighlighter)).render("x", Some("a\"b"));
        assert!(html.contains(r#"class="lang-a&quot;b""#));
    }

    #[test]
    fn test_languages_sorted() {
        let dispatcher = CodeDispatcher::new(Box::new(NoopHighlighter))
            .with_language("tsv-h", Verbatim)
            .with_language("plantuml", Verbatim)
            .with_language("tsv", Verbatim);
        assert_eq!(dispatcher.languages(), vec!["plantuml", "tsv", "tsv-h"]);
    }
}
