//! Wiki markdown rendering pipeline.
//!
//! This crate turns raw page source into an embeddable HTML fragment in
//! three ordered stages:
//!
//! 1. **Pre-processing**: text-to-text [`Processor`]s run over the source.
//! 2. **Parsing**: [`MarkdownRenderer`] walks pulldown-cmark events and hands
//!    every code block to the [`CodeDispatcher`].
//! 3. **Post-processing**: HTML-to-HTML [`Processor`]s run over the output.
//!
//! The dispatcher routes fenced code either to a registered
//! [`LanguageProcessor`] (keyed by the language part of the fence tag) or to
//! a [`Highlighter`], falling back to escaped plain code.
//!
//! # Example
//!
//! ```
//! use wk_renderer::{NoopHighlighter, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .with_highlighter(NoopHighlighter)
//!     .build();
//!
//! let html = pipeline.render("# Hello\n\n```\n<b>\n```", None);
//! assert!(html.contains(r#"<h1 id="hello">Hello</h1>"#));
//! assert!(html.contains(r#"<pre class="wiki-code"><code>&lt;b&gt;"#));
//! ```

mod code_block;
mod dispatcher;
mod highlight;
mod pipeline;
mod processor;
mod renderer;
pub mod source;
mod state;
mod util;

pub use code_block::{LanguageProcessor, LanguageTag};
pub use dispatcher::CodeDispatcher;
pub use highlight::{HighlightError, Highlighter, NoopHighlighter, SyntectHighlighter};
pub use pipeline::{Pipeline, PipelineBuilder, RenderError};
pub use processor::{Processor, RenderContext};
pub use renderer::MarkdownRenderer;
pub use state::{escape, escape_html, slugify};
pub use util::resolve_link;
