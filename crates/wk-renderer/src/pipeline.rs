//! Render pipeline: pre-processors, markdown parsing, post-processors.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::code_block::LanguageProcessor;
use crate::dispatcher::CodeDispatcher;
use crate::highlight::{Highlighter, SyntectHighlighter};
use crate::processor::{Processor, RenderContext};
use crate::renderer::MarkdownRenderer;

/// Error raised by the parse stage.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The parser, a language processor or the highlighter panicked.
    #[error("markdown parsing panicked: {0}")]
    Panicked(String),
}

/// Ordered render pipeline.
///
/// Built once with [`Pipeline::builder`] and shared across renders; all
/// methods take `&self`.
pub struct Pipeline {
    pre_processors: Vec<Box<dyn Processor>>,
    post_processors: Vec<Box<dyn Processor>>,
    dispatcher: CodeDispatcher,
    gfm: bool,
    breaks: bool,
}

impl Pipeline {
    /// Start building a pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run every enabled pre-processor over the source, in order.
    pub fn pre_process(&self, source: &str, context: Option<&RenderContext>) -> String {
        run_processors(&self.pre_processors, source, context)
    }

    /// Convert markdown to HTML.
    ///
    /// A panic anywhere in parsing, code-block dispatch or highlighting is
    /// contained and returned as [`RenderError::Panicked`].
    pub fn parse(
        &self,
        markdown: &str,
        context: Option<&RenderContext>,
    ) -> Result<String, RenderError> {
        let page_path = context.and_then(RenderContext::page_path);
        panic::catch_unwind(AssertUnwindSafe(|| {
            MarkdownRenderer::new(&self.dispatcher)
                .with_page_path(page_path)
                .with_gfm(self.gfm)
                .with_breaks(self.breaks)
                .render_markdown(markdown)
        }))
        .map_err(|payload| RenderError::Panicked(panic_message(payload.as_ref())))
    }

    /// Run every enabled post-processor over the HTML, in order.
    pub fn post_process(&self, html: &str, context: Option<&RenderContext>) -> String {
        run_processors(&self.post_processors, html, context)
    }

    /// Render source to HTML, reporting a parse failure to the caller.
    pub fn try_render(
        &self,
        source: &str,
        context: Option<&RenderContext>,
    ) -> Result<String, RenderError> {
        let markdown = self.pre_process(source, context);
        let html = self.parse(&markdown, context)?;
        Ok(self.post_process(&html, context))
    }

    /// Render source to HTML.
    ///
    /// A parse failure is logged and the post-processors run on an empty
    /// document, so the caller always gets a (possibly empty) fragment.
    pub fn render(&self, source: &str, context: Option<&RenderContext>) -> String {
        let markdown = self.pre_process(source, context);
        let html = self.parse(&markdown, context).unwrap_or_else(|err| {
            tracing::error!(
                error = %err,
                page = context.and_then(RenderContext::page_path),
                "Failed to parse markdown"
            );
            String::new()
        });
        self.post_process(&html, context)
    }

    /// Render a single code block through the dispatcher.
    pub fn code_render(&self, code: &str, lang_tag: Option<&str>) -> String {
        self.dispatcher.render(code, lang_tag)
    }

    /// Registered language keys, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.dispatcher.languages()
    }
}

fn run_processors(
    processors: &[Box<dyn Processor>],
    input: &str,
    context: Option<&RenderContext>,
) -> String {
    let mut text = input.to_owned();
    for processor in processors {
        if processor.is_enabled() {
            text = processor.process(&text, context);
        } else {
            tracing::debug!(processor = processor.name(), "Processor disabled, skipping");
        }
    }
    text
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    pre_processors: Vec<Box<dyn Processor>>,
    post_processors: Vec<Box<dyn Processor>>,
    languages: Vec<(String, Box<dyn LanguageProcessor>)>,
    highlighter: Option<Box<dyn Highlighter>>,
    gfm: bool,
    breaks: bool,
}

impl PipelineBuilder {
    fn new() -> Self {
        Self {
            pre_processors: Vec::new(),
            post_processors: Vec::new(),
            languages: Vec::new(),
            highlighter: None,
            gfm: true,
            breaks: true,
        }
    }

    /// Append a pre-processor (runs on markdown source).
    #[must_use]
    pub fn with_pre_processor<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.pre_processors.push(Box::new(processor));
        self
    }

    /// Append a post-processor (runs on rendered HTML).
    #[must_use]
    pub fn with_post_processor<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.post_processors.push(Box::new(processor));
        self
    }

    /// Register a language processor for fenced code with this language.
    #[must_use]
    pub fn with_language<P: LanguageProcessor + 'static>(
        mut self,
        key: impl Into<String>,
        processor: P,
    ) -> Self {
        self.languages.push((key.into(), Box::new(processor)));
        self
    }

    /// Replace the default syntect highlighter.
    #[must_use]
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    /// Enable or disable GitHub Flavored Markdown (default: enabled).
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Render single newlines as `<br>` (default: enabled).
    #[must_use]
    pub fn with_breaks(mut self, enabled: bool) -> Self {
        self.breaks = enabled;
        self
    }

    /// Build the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        let highlighter = self
            .highlighter
            .unwrap_or_else(|| Box::new(SyntectHighlighter::new()));
        let mut dispatcher = CodeDispatcher::new(highlighter);
        for (key, processor) in self.languages {
            dispatcher.register(key, processor);
        }

        Pipeline {
            pre_processors: self.pre_processors,
            post_processors: self.post_processors,
            dispatcher,
            gfm: self.gfm,
            breaks: self.breaks,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::highlight::{HighlightError, NoopHighlighter};
    use crate::state::escape_html;

    struct Append(&'static str);

    impl Processor for Append {
        fn name(&self) -> &str {
            "append"
        }

        fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
            format!("{text}{}", self.0)
        }
    }

    struct Disabled;

    impl Processor for Disabled {
        fn name(&self) -> &str {
            "disabled"
        }

        fn process(&self, _text: &str, _context: Option<&RenderContext>) -> String {
            "SHOULD NOT RUN".to_owned()
        }

        fn is_enabled(&self) -> bool {
            false
        }
    }

    struct PagePath;

    impl Processor for PagePath {
        fn name(&self) -> &str {
            "page-path"
        }

        fn process(&self, text: &str, context: Option<&RenderContext>) -> String {
            let page = context.and_then(RenderContext::page_path).unwrap_or("-");
            format!("{text}[{page}]")
        }
    }

    struct Panics;

    impl LanguageProcessor for Panics {
        fn process(&self, _code: &str, _lang_tag: &str) -> String {
            panic!("boom");
        }
    }

    struct Table;

    impl LanguageProcessor for Table {
        fn process(&self, code: &str, lang_tag: &str) -> String {
            format!("<table data-tag=\"{lang_tag}\">{}</table>", code.trim())
        }
    }

    struct RecognizesJs;

    impl Highlighter for RecognizesJs {
        fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
            if language == "js" {
                Ok(format!("<span class=\"hl-js\">{}</span>", escape_html(code)))
            } else {
                Err(HighlightError::UnsupportedLanguage(language.to_owned()))
            }
        }
    }

    struct RejectsBang;

    impl Highlighter for RejectsBang {
        fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
            if code.contains('!') {
                Err(HighlightError::Syntax {
                    language: language.to_owned(),
                    message: "unexpected `!`".to_owned(),
                })
            } else {
                Ok(format!("<span class=\"hl-{language}\">{}</span>", escape_html(code)))
            }
        }
    }

    fn plain() -> Pipeline {
        Pipeline::builder().with_highlighter(NoopHighlighter).build()
    }

    #[test]
    fn test_empty_pipeline_renders_markdown() {
        assert_eq!(plain().render("*hi*", None), "<p><em>hi</em></p>");
    }

    #[test]
    fn test_processors_run_in_order() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_pre_processor(Append(" a"))
            .with_pre_processor(Append(" b"))
            .with_post_processor(Append("<!--1-->"))
            .with_post_processor(Append("<!--2-->"))
            .build();

        assert_eq!(pipeline.pre_process("x", None), "x a b");
        assert_eq!(
            pipeline.render("x", None),
            "<p>x a b</p><!--1--><!--2-->"
        );
    }

    #[test]
    fn test_disabled_processor_is_skipped() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_pre_processor(Disabled)
            .with_post_processor(Disabled)
            .build();
        assert_eq!(pipeline.render("x", None), "<p>x</p>");
    }

    #[test]
    fn test_context_reaches_processors() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_post_processor(PagePath)
            .build();
        let context = RenderContext::for_page("/a/b");
        assert_eq!(pipeline.render("x", Some(&context)), "<p>x</p>[/a/b]");
        assert_eq!(pipeline.render("x", None), "<p>x</p>[-]");
    }

    #[test]
    fn test_context_resolves_links() {
        let context = RenderContext::for_page("/user/alice/memo");
        assert_eq!(
            plain().render("[t](./todo)", Some(&context)),
            r#"<p><a href="/user/alice/todo">t</a></p>"#
        );
    }

    #[test]
    fn test_end_to_end_js_block() {
        let pipeline = Pipeline::builder().with_highlighter(RecognizesJs).build();
        assert_eq!(
            pipeline.render("```js\nalert(1)\n```", None),
            "<pre class=\"wiki-code wiki-lang\"><code class=\"lang-js\"><span class=\"hl-js\">alert(1)\n</span></code></pre>"
        );
    }

    #[test]
    fn test_language_processor_output_verbatim() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_language("tsv-h", Table)
            .build();
        assert_eq!(
            pipeline.render("```tsv-h:Members\na\tb\n```", None),
            "<table data-tag=\"tsv-h:Members\">a\tb</table>"
        );
    }

    #[test]
    fn test_default_highlighter_is_syntect() {
        let html = Pipeline::builder()
            .build()
            .code_render("let x = 1;\n", Some("rust"));
        assert!(html.starts_with(r#"<pre class="wiki-code wiki-lang"><code class="lang-rust">"#));
        assert!(html.contains("hl-"));
    }

    #[test]
    fn test_panicking_language_processor_is_contained() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_language("bad", Panics)
            .with_post_processor(Append("<!--post-->"))
            .build();

        let err = pipeline
            .try_render("```bad\nx\n```", None)
            .unwrap_err();
        assert!(matches!(&err, RenderError::Panicked(message) if message == "boom"));

        assert_eq!(pipeline.render("```bad\nx\n```", None), "<!--post-->");
    }

    #[test]
    fn test_failed_highlight_leaves_other_blocks_alone() {
        let pipeline = Pipeline::builder().with_highlighter(RejectsBang).build();
        let html = pipeline
            .try_render("```js\nalert(1)!\n```\n\n```js\na < b\n```\n\ntail\n", None)
            .unwrap();
        assert_eq!(
            html,
            concat!(
                r#"<pre class="wiki-code wiki-lang"><code class="lang-js">alert(1)!"#,
                "\n</code></pre>",
                r#"<pre class="wiki-code wiki-lang"><code class="lang-js"><span class="hl-js">a &lt; b"#,
                "\n</span></code></pre>",
                "<p>tail</p>",
            )
        );
    }

    #[test]
    fn test_try_render_success() {
        assert_eq!(plain().try_render("# T", None).unwrap(), r#"<h1 id="t">T</h1>"#);
    }

    #[test]
    fn test_post_process_idempotent_without_triggers() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_post_processor(Disabled)
            .build();
        let html = "<p>plain</p>";
        let once = pipeline.post_process(html, None);
        let twice = pipeline.post_process(&once, None);
        assert_eq!(once, html);
        assert_eq!(twice, html);
    }

    #[test]
    fn test_languages_sorted() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_language("tsv-h", Table)
            .with_language("tsv", Table)
            .build();
        assert_eq!(pipeline.languages(), vec!["tsv", "tsv-h"]);
    }

    #[test]
    fn test_pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    #[test]
    fn test_without_breaks() {
        let pipeline = Pipeline::builder()
            .with_highlighter(NoopHighlighter)
            .with_breaks(false)
            .build();
        assert_eq!(pipeline.render("a\nb", None), "<p>a\nb</p>");
    }
}
