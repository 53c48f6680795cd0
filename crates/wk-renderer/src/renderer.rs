//! Markdown to HTML event renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::code_block::fence_language;
use crate::dispatcher::CodeDispatcher;
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, escape_html};
use crate::util::{heading_level_to_num, resolve_link};

/// Markdown renderer producing an HTML fragment.
///
/// Walks pulldown-cmark events and writes HTML directly. Every code block,
/// fenced or indented, is handed to the [`CodeDispatcher`] together with the
/// language tag from its fence.
///
/// A renderer holds per-document state (heading ids, open tables), so create
/// one per render.
pub struct MarkdownRenderer<'a> {
    dispatcher: &'a CodeDispatcher,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    page_path: Option<&'a str>,
    pending_image: Option<(String, String)>,
    gfm: bool,
    breaks: bool,
}

impl<'a> MarkdownRenderer<'a> {
    /// Create a renderer with GFM and line breaks enabled.
    #[must_use]
    pub fn new(dispatcher: &'a CodeDispatcher) -> Self {
        Self {
            dispatcher,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            page_path: None,
            pending_image: None,
            gfm: true,
            breaks: true,
        }
    }

    /// Set the page path used to resolve `./` and `../` links.
    #[must_use]
    pub fn with_page_path(mut self, page_path: Option<&'a str>) -> Self {
        self.page_path = page_path;
        self
    }

    /// Toggle the markdown extensions: tables, `~~strike~~`, `- [x]` task
    /// items, alert blockquotes (rendered as plain blockquotes), definition
    /// lists, `^sup^` and `~sub~`. On by default.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Render single newlines inside paragraphs as `<br>`.
    ///
    /// Enabled by default.
    #[must_use]
    pub fn with_breaks(mut self, enabled: bool) -> Self {
        self.breaks = enabled;
        self
    }

    /// `pulldown-cmark` options matching the extension setting.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
                | Options::ENABLE_DEFINITION_LIST
                | Options::ENABLE_SUPERSCRIPT
                | Options::ENABLE_SUBSCRIPT
        } else {
            Options::empty()
        }
    }

    #[must_use]
    pub fn create_parser<'m>(&self, markdown: &'m str) -> Parser<'m> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text using the configured parser options.
    pub fn render_markdown(self, markdown: &str) -> String {
        let parser = self.create_parser(markdown);
        self.render(parser)
    }

    /// Render markdown events into HTML.
    pub fn render<'e, I>(mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.output
    }

    /// Inline markup goes to the heading buffer while a heading is open and
    /// is dropped inside image alt text.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in parser options
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => fence_language(info).map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let href = resolve_link(&dest_url, self.page_path);
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(r#" title="{}""#, escape_html(&title))
                };
                let link_tag = format!(r#"<a href="{}"{title_attr}>"#, escape_html(&href));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the end tag
                self.image.start();
                let src = resolve_link(&dest_url, self.page_path);
                self.pending_image = Some((src, title.to_string()));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                let html = self.dispatcher.render(&content, lang.as_deref());
                self.output.push_str(&html);
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    self.image_tag(&src, &alt, &title);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.breaks {
            self.push_inline("<br>\n");
        } else {
            self.push_inline("\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.output
                .push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            self.output.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }

    fn image_tag(&mut self, src: &str, alt: &str, title: &str) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        let html = format!(
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        );
        self.push_inline(&html);
    }
}
