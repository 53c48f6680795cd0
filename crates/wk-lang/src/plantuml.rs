use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use wk_renderer::{LanguageProcessor, LanguageTag, escape_html};

/// Renders `PlantUML` diagrams as images served by a Kroki-compatible server.
///
/// The diagram source travels in the image URL, deflated and URL-safe base64
/// encoded, so rendering needs no network access. Without a server the
/// source is shown as an escaped code block.
#[derive(Clone, Debug, Default)]
pub struct PlantUml {
    server_url: Option<String>,
}

impl PlantUml {
    /// Processor for the given server base URL (e.g. `https://kroki.io`).
    #[must_use]
    pub fn new(server_url: Option<String>) -> Self {
        Self {
            server_url: server_url.map(|url| url.trim_end_matches('/').to_owned()),
        }
    }

    fn diagram_url(&self, server: &str, code: &str) -> std::io::Result<String> {
        let source = wrap_diagram(code);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(source.as_bytes())?;
        let compressed = encoder.finish()?;
        Ok(format!(
            "{server}/plantuml/svg/{}",
            URL_SAFE.encode(compressed)
        ))
    }
}

impl LanguageProcessor for PlantUml {
    fn process(&self, code: &str, lang_tag: &str) -> String {
        let tag = LanguageTag::parse(lang_tag);
        let cite = tag
            .function
            .map(|function| format!("<cite>{}</cite>", escape_html(function)))
            .unwrap_or_default();

        let Some(server) = self.server_url.as_deref() else {
            return source_block(&cite, code);
        };

        match self.diagram_url(server, code) {
            Ok(url) => format!(
                r#"<div class="plantuml-diagram">{cite}<img class="plantuml" src="{}" alt="{}"></div>"#,
                escape_html(&url),
                escape_html(tag.function.unwrap_or("PlantUML diagram"))
            ),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to encode PlantUML diagram");
                source_block(&cite, code)
            }
        }
    }
}

fn source_block(cite: &str, code: &str) -> String {
    format!(
        r#"<pre class="wiki-code wiki-lang">{cite}<code class="lang-plantuml">{}</code></pre>"#,
        escape_html(code)
    )
}

/// Add `@startuml`/`@enduml` unless the source already opens a diagram.
fn wrap_diagram(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.starts_with("@start") {
        trimmed.to_owned()
    } else {
        format!("@startuml\n{trimmed}\n@enduml")
    }
}
