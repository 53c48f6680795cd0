//! `wk render` command implementation.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Args;
use wk_config::{CliSettings, Config};
use wk_renderer::RenderContext;

use crate::bootstrap::build_pipeline;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: read stdin).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover wk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wiki path of the page, used to resolve relative links.
    #[arg(long)]
    page: Option<String>,

    /// Disable math markup (overrides config).
    #[arg(long)]
    no_math: bool,

    /// Disable HTML sanitizing (overrides config).
    #[arg(long)]
    no_sanitize: bool,

    /// `PlantUML` server URL (overrides config).
    #[arg(long, env = "WK_PLANTUML_URL")]
    plantuml_url: Option<String>,

    /// Fail when the markdown cannot be parsed instead of printing empty output.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or input cannot be loaded, writing
    /// the output fails, or parsing fails in strict mode.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if self.verbose {
            match &config.config_path {
                Some(path) => output.note(&format!("Config: {}", path.display())),
                None => output.note("Config: defaults (no wk.toml found)"),
            }
        }

        let source = self.read_source()?;
        let pipeline = build_pipeline(&config);
        let context = self.page.map(RenderContext::for_page);

        let html = if self.strict {
            pipeline.try_render(&source, context.as_ref())?
        } else {
            pipeline.render(&source, context.as_ref())
        };

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        if !html.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            math_enabled: self.no_math.then_some(false),
            sanitize: self.no_sanitize.then_some(false),
            plantuml_url: self.plantuml_url.clone(),
        }
    }

    fn read_source(&self) -> Result<String, CliError> {
        if let Some(path) = &self.file {
            tracing::info!(path = %path.display(), "Rendering file");
            return Ok(std::fs::read_to_string(path)?);
        }
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    }
}
