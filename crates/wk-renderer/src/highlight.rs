//! Syntax highlighting for code blocks without a language processor.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Error returned when a code block cannot be highlighted.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// No grammar is known for the language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    /// The grammar failed on the input.
    #[error("failed to highlight {language}: {message}")]
    Syntax {
        /// Language that was being highlighted.
        language: String,
        /// Error reported by the highlighter.
        message: String,
    },
}

/// Syntax highlighter used by the code-block dispatcher.
///
/// Output must already be HTML-escaped; the dispatcher embeds it verbatim.
pub trait Highlighter: Send + Sync {
    /// Highlight `code` written in `language`.
    fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError>;
}

/// Class-based highlighter backed by syntect's bundled grammars.
///
/// Emits `<span class="hl-…">` markup so themes live in the stylesheet.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    class_style: ClassStyle,
}

impl SyntectHighlighter {
    /// Load the default grammar set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            class_style: ClassStyle::SpacedPrefixed { prefix: "hl-" },
        }
    }

    fn find_syntax(&self, token: &str) -> Option<&SyntaxReference> {
        let lowercase = token.to_ascii_lowercase();
        self.syntax_set
            .find_syntax_by_token(&lowercase)
            .or_else(|| self.syntax_set.find_syntax_by_name(token))
            .or_else(|| self.syntax_set.find_syntax_by_extension(&lowercase))
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, language: &str, code: &str) -> Result<String, HighlightError> {
        if language.is_empty() {
            return Err(HighlightError::UnsupportedLanguage(String::new()));
        }
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(language.to_owned()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, self.class_style);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| HighlightError::Syntax {
                    language: language.to_owned(),
                    message: err.to_string(),
                })?;
        }
        Ok(generator.finalize())
    }
}

/// Highlighter that recognizes no language.
///
/// Every code block takes the escaped fallback path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHighlighter;

impl Highlighter for NoopHighlighter {
    fn highlight(&self, language: &str, _code: &str) -> Result<String, HighlightError> {
        Err(HighlightError::UnsupportedLanguage(language.to_owned()))
    }
}
