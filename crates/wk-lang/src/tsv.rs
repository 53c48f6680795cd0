use std::fmt::Write;

use wk_renderer::{LanguageProcessor, LanguageTag, escape_html};

/// Renders tab-separated values as an HTML table.
///
/// Trailing empty lines are ignored and every cell is escaped. With a header
/// the first row becomes `<thead>`. The tag's function part, if any, becomes
/// the table caption.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tsv2Table {
    header: bool,
}

impl Tsv2Table {
    /// Table without a header row (`tsv`).
    #[must_use]
    pub fn new() -> Self {
        Self { header: false }
    }

    /// Table whose first row is the header (`tsv-h`).
    #[must_use]
    pub fn with_header() -> Self {
        Self { header: true }
    }
}

impl LanguageProcessor for Tsv2Table {
    fn process(&self, code: &str, lang_tag: &str) -> String {
        let mut rows: Vec<&str> = code.lines().collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }

        let mut html = String::from(r#"<table class="wiki-table tsv-table">"#);
        if let Some(caption) = LanguageTag::parse(lang_tag).function {
            write!(html, "<caption>{}</caption>", escape_html(caption)).unwrap();
        }

        let mut body = rows.as_slice();
        if self.header
            && let Some((head, rest)) = body.split_first()
        {
            html.push_str("<thead>");
            push_row(&mut html, head, "th");
            html.push_str("</thead>");
            body = rest;
        }

        html.push_str("<tbody>");
        for row in body {
            push_row(&mut html, row, "td");
        }
        html.push_str("</tbody></table>");
        html
    }
}

fn push_row(html: &mut String, row: &str, cell_tag: &str) {
    html.push_str("<tr>");
    for cell in row.split('\t') {
        write!(html, "<{cell_tag}>{}</{cell_tag}>", escape_html(cell)).unwrap();
    }
    html.push_str("</tr>");
}
