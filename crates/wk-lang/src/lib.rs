//! Language processors for fenced code blocks.
//!
//! Each processor renders a whole code block in place of syntax
//! highlighting:
//!
//! | key | processor |
//! |-----|-----------|
//! | `tsv` | [`Tsv2Table`] |
//! | `tsv-h` | [`Tsv2Table`] with a header row |
//! | `template` | [`Template`] |
//! | `plantuml` | [`PlantUml`] |
//!
//! # Example
//!
//! ```
//! use wk_lang::Tsv2Table;
//! use wk_renderer::{NoopHighlighter, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .with_highlighter(NoopHighlighter)
//!     .with_language("tsv-h", Tsv2Table::with_header())
//!     .build();
//!
//! let html = pipeline.render("```tsv-h\nname\trole\nalice\tadmin\n```", None);
//! assert!(html.contains("<th>name</th><th>role</th>"));
//! ```

mod plantuml;
mod template;
mod tsv;

pub use plantuml::PlantUml;
pub use template::Template;
pub use tsv::Tsv2Table;
