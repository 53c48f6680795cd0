use chrono::{Datelike, Local, NaiveDate};
use sha2::{Digest, Sha256};
use wk_renderer::{LanguageProcessor, LanguageTag, escape_html};

/// Renders a page template with a button that creates a page from it.
///
/// The target page name comes from the tag's function part
/// (`template:/user/{user}/memo/{year}/{month}/{day}`) with placeholders
/// expanded; without a function part the tag itself is the name. Unknown
/// placeholders, and `{user}` when no user is configured, are kept as
/// written.
///
/// The template body is shown escaped in a code block whose id links it to
/// the button. Ids are derived from the tag and body, so the same block
/// always gets the same id.
#[derive(Clone, Debug, Default)]
pub struct Template {
    user: Option<String>,
    date: Option<NaiveDate>,
}

impl Template {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name substituted for `{user}`.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Fix the date used for `{year}`, `{month}` and `{day}` instead of today.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn page_name(&self, pattern: &str) -> String {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut name = pattern
            .replace("{year}", &format!("{:04}", date.year()))
            .replace("{month}", &format!("{:02}", date.month()))
            .replace("{day}", &format!("{:02}", date.day()));
        if let Some(user) = &self.user {
            name = name.replace("{user}", user);
        }
        name
    }
}

impl LanguageProcessor for Template {
    fn process(&self, code: &str, lang_tag: &str) -> String {
        let tag = LanguageTag::parse(lang_tag);
        let page_name = match tag.function {
            Some(pattern) => self.page_name(pattern),
            None => lang_tag.to_owned(),
        };
        let page_name = escape_html(&page_name);
        let id = template_id(lang_tag, code);

        format!(
            concat!(
                r#"<div class="page-template">"#,
                r#"<button type="button" class="template-button" data-template="{id}" data-path="{name}">{name}</button>"#,
                r#"<pre class="wiki-code"><code id="{id}" class="lang-template">{code}</code></pre>"#,
                "</div>",
            ),
            id = id,
            name = page_name,
            code = escape_html(code),
        )
    }
}

/// `template-` followed by the first 16 hex digits of SHA-256 over tag and body.
fn template_id(lang_tag: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(lang_tag.as_bytes());
    hasher.update(b"\0");
    hasher.update(code.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("template-{}", &digest[..16])
}
