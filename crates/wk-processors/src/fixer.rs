use std::sync::LazyLock;

use regex::Regex;
use wk_renderer::source::map_lines_outside_code;
use wk_renderer::{Processor, RenderContext};

static HEADING_WITHOUT_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})([^#\s])").unwrap());

/// Inserts the space `CommonMark` requires after heading hashes.
///
/// `#Title` → `# Title`, `###Title` → `### Title`. Lines inside code blocks
/// are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownFixer;

impl Processor for MarkdownFixer {
    fn name(&self) -> &str {
        "markdown-fixer"
    }

    fn process(&self, text: &str, _context: Option<&RenderContext>) -> String {
        map_lines_outside_code(text, |line| {
            HEADING_WITHOUT_SPACE.replace(line, "$1 $2").into_owned()
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fix(text: &str) -> String {
        MarkdownFixer.process(text, None)
    }

    #[test]
    fn test_inserts_space() {
        assert_eq!(fix("#Title"), "# Title");
        assert_eq!(fix("###Sub"), "### Sub");
    }

    #[test]
    fn test_leaves_valid_headings() {
        assert_eq!(fix("# Title\n## Sub"), "# Title\n## Sub");
    }

    #[test]
    fn test_seven_hashes_untouched() {
        assert_eq!(fix("#######x"), "#######x");
    }

    #[test]
    fn test_only_line_start() {
        assert_eq!(fix("issue #12"), "issue #12");
    }

    #[test]
    fn test_quoted_fence_untouched() {
        assert_eq!(fix("> ```sh\n> #comment\n> ```\n"), "> ```sh\n> #comment\n> ```\n");
    }

    #[test]
    fn test_fenced_code_untouched() {
        assert_eq!(
            fix("#A\n```sh\n#!/bin/sh\n#comment\n```\n#B\n"),
            "# A\n```sh\n#!/bin/sh\n#comment\n```\n# B\n"
        );
    }
}
