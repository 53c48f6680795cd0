//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter. Writes to stderr so stdout carries only HTML.
pub(crate) struct Output {
    term: Term,
    red: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print a secondary message (dimmed).
    pub(crate) fn note(&self, msg: &str) {
        let _ = self.term.write_line(&self.dim.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
