//! `wk languages` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use wk_config::Config;

use crate::bootstrap::build_pipeline;
use crate::error::CliError;

/// Arguments for the languages command.
#[derive(Args)]
pub(crate) struct LanguagesArgs {
    /// Path to configuration file (default: auto-discover wk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LanguagesArgs {
    /// Execute the languages command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let pipeline = build_pipeline(&config);
        let mut stdout = std::io::stdout().lock();
        for language in pipeline.languages() {
            writeln!(stdout, "{language}")?;
        }
        Ok(())
    }
}
