//! Text-to-text processors run before and after markdown parsing.

/// Per-render context handed to every processor.
///
/// Replaces ambient page state: processors that need to know which page is
/// being rendered read it from here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderContext {
    page_path: Option<String>,
}

impl RenderContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context for the page at `path` (e.g. `/user/alice/memo`).
    #[must_use]
    pub fn for_page(path: impl Into<String>) -> Self {
        Self {
            page_path: Some(path.into()),
        }
    }

    /// Path of the page being rendered, if known.
    #[must_use]
    pub fn page_path(&self) -> Option<&str> {
        self.page_path.as_deref()
    }
}

/// A pre- or post-processing step.
///
/// Pre-processors receive markdown source, post-processors receive HTML.
/// Processors are shared across renders and must not keep per-call state.
pub trait Processor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Transform `text`.
    fn process(&self, text: &str, context: Option<&RenderContext>) -> String;

    /// Whether the processor takes part in rendering.
    ///
    /// A disabled processor is skipped without error.
    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Processor for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
            text.to_uppercase()
        }
    }

    #[test]
    fn test_enabled_by_default() {
        assert!(Upper.is_enabled());
        assert_eq!(Upper.process("abc", None), "ABC");
    }

    #[test]
    fn test_context_page_path() {
        assert_eq!(RenderContext::new().page_path(), None);
        assert_eq!(
            RenderContext::for_page("/user/alice/memo").page_path(),
            Some("/user/alice/memo")
        );
    }
}
