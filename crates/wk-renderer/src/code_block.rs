//! Language processors and fence tag parsing.
//!
//! A fenced code block carries a language tag of the form
//! `<language>[:<function>]`, e.g. `js`, `tsv-h` or `plantuml:Login flow`.
//! The language part selects a [`LanguageProcessor`]; the function part is an
//! annotation that processors and the default wrapper may display.
//!
//! # Example
//!
//! ```
//! use wk_renderer::{LanguageProcessor, LanguageTag, escape_html};
//!
//! struct Shout;
//!
//! impl LanguageProcessor for Shout {
//!     fn process(&self, code: &str, lang_tag: &str) -> String {
//!         let tag = LanguageTag::parse(lang_tag);
//!         format!(
//!             "<p data-lang=\"{}\">{}</p>",
//!             tag.language,
//!             escape_html(&code.to_uppercase())
//!         )
//!     }
//! }
//!
//! assert_eq!(Shout.process("hi", "shout:x"), r#"<p data-lang="shout">HI</p>"#);
//! ```

/// Transform for one fenced-code language, bypassing syntax highlighting.
///
/// The returned string is embedded verbatim, so implementations must escape
/// any source text they include.
pub trait LanguageProcessor: Send + Sync {
    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `code` - Raw content of the code block
    /// * `lang_tag` - The full fence tag, including any `:function` part
    fn process(&self, code: &str, lang_tag: &str) -> String;
}

/// A fence language tag split into language and optional function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageTag<'a> {
    /// The full tag as written in the fence.
    pub raw: &'a str,
    /// Part before the first `:`.
    pub language: &'a str,
    /// Part after the first `:`, if non-empty.
    pub function: Option<&'a str>,
}

impl<'a> LanguageTag<'a> {
    /// Split a tag on its first colon.
    ///
    /// ```
    /// use wk_renderer::LanguageTag;
    ///
    /// let tag = LanguageTag::parse("js:MyDiagram");
    /// assert_eq!(tag.language, "js");
    /// assert_eq!(tag.function, Some("MyDiagram"));
    /// ```
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(':') {
            Some((language, function)) => Self {
                raw,
                language,
                function: Some(function).filter(|f| !f.is_empty()),
            },
            None => Self {
                raw,
                language: raw,
                function: None,
            },
        }
    }
}

/// Extract the language tag from a fence info string.
///
/// The tag is the first whitespace-separated token; when that token carries a
/// `:function` part, the function runs to the end of the line so it may
/// contain spaces. Spaces and dots before the tag are ignored, so
/// ```` ```.js ```` and ```` ``` js ```` both yield `js`.
/// Returns `None` when no tag remains.
pub(crate) fn fence_language(info: &str) -> Option<&str> {
    let info = info.trim_start_matches([' ', '.']).trim_end();
    let first = info.split_whitespace().next()?;
    if first.contains(':') {
        Some(info)
    } else {
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let tag = LanguageTag::parse("js");
        assert_eq!(tag.raw, "js");
        assert_eq!(tag.language, "js");
        assert_eq!(tag.function, None);
    }

    #[test]
    fn test_parse_language_and_function() {
        let tag = LanguageTag::parse("plantuml:Login flow");
        assert_eq!(tag.language, "plantuml");
        assert_eq!(tag.function, Some("Login flow"));
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let tag = LanguageTag::parse("template:/daily/{year}:{month}");
        assert_eq!(tag.language, "template");
        assert_eq!(tag.function, Some("/daily/{year}:{month}"));
    }

    #[test]
    fn test_parse_empty_function_is_none() {
        let tag = LanguageTag::parse("js:");
        assert_eq!(tag.language, "js");
        assert_eq!(tag.function, None);
    }

    #[test]
    fn test_fence_language_first_token() {
        assert_eq!(fence_language("js"), Some("js"));
        assert_eq!(fence_language("js title=main"), Some("js"));
    }

    #[test]
    fn test_fence_language_function_runs_to_end_of_line() {
        assert_eq!(
            fence_language("plantuml:Login flow  "),
            Some("plantuml:Login flow")
        );
    }

    #[test]
    fn test_fence_language_leading_dots_and_spaces() {
        assert_eq!(fence_language(".js"), Some("js"));
        assert_eq!(fence_language(" . tsv-h"), Some("tsv-h"));
    }

    #[test]
    fn test_fence_language_empty() {
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
        assert_eq!(fence_language(" ..."), None);
    }
}
