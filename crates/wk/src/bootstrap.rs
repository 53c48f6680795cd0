//! Pipeline assembly from configuration.

use wk_config::Config;
use wk_lang::{PlantUml, Template, Tsv2Table};
use wk_processors::{Emoji, ImageExpander, Linker, MarkdownFixer, Math, Sanitizer};
use wk_renderer::{NoopHighlighter, Pipeline};

/// Build the wiki render pipeline.
///
/// Pre-processors normalize the markdown and turn wiki shorthands into
/// links and images. Post-processors decorate the HTML; the sanitizer runs
/// last so it sees everything the other stages produced.
pub(crate) fn build_pipeline(config: &Config) -> Pipeline {
    let mut template = Template::new();
    if let Some(user) = &config.template.user {
        template = template.with_user(user.clone());
    }

    let mut builder = Pipeline::builder()
        .with_gfm(config.renderer.gfm)
        .with_breaks(config.renderer.breaks)
        .with_pre_processor(MarkdownFixer)
        .with_pre_processor(Linker)
        .with_pre_processor(ImageExpander)
        .with_post_processor(Emoji::new(config.emoji.enabled))
        .with_post_processor(Math::new(config.math.enabled))
        .with_post_processor(Sanitizer::new(config.renderer.sanitize))
        .with_language("tsv", Tsv2Table::new())
        .with_language("tsv-h", Tsv2Table::with_header())
        .with_language("template", template)
        .with_language("plantuml", PlantUml::new(config.plantuml.server_url.clone()));

    if !config.renderer.highlight {
        builder = builder.with_highlighter(NoopHighlighter);
    }

    tracing::debug!(
        gfm = config.renderer.gfm,
        breaks = config.renderer.breaks,
        highlight = config.renderer.highlight,
        sanitize = config.renderer.sanitize,
        math = config.math.enabled,
        emoji = config.emoji.enabled,
        "Built render pipeline"
    );

    builder.build()
}
