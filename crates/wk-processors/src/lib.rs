//! Default processors for the wiki rendering pipeline.
//!
//! Pre-processors rewrite markdown source before parsing:
//! - [`MarkdownFixer`]: `#Heading` → `# Heading`
//! - [`Linker`]: `</page/path>` and `[/page/path]` → page links
//! - [`ImageExpander`]: bare image URLs → inline images
//!
//! Post-processors rewrite the rendered HTML:
//! - [`Emoji`]: `:shortcode:` → emoji
//! - [`Math`]: `$$…$$` → client-side math markup
//! - [`Sanitizer`]: allow-list HTML sanitizer, meant to run last
//!
//! Pre-processors never touch fenced code blocks; post-processors never touch
//! the contents of `<pre>`, `<code>`, `<script>` or `<style>` elements.

mod emoji;
mod fixer;
mod html;
mod image;
mod inline;
mod linker;
mod math;
mod sanitize;

pub use emoji::Emoji;
pub use fixer::MarkdownFixer;
pub use image::ImageExpander;
pub use linker::Linker;
pub use math::Math;
pub use sanitize::Sanitizer;
