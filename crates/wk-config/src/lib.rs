//! Configuration management for the wiki renderer.
//!
//! Parses `wk.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `plantuml.server_url`
//! - `template.user`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override math rendering flag.
    pub math_enabled: Option<bool>,
    /// Override HTML sanitizing flag.
    pub sanitize: Option<bool>,
    /// Override `PlantUML` server URL.
    pub plantuml_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wk.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown renderer configuration.
    pub renderer: RendererConfig,
    /// Math post-processor configuration.
    pub math: MathConfig,
    /// Emoji post-processor configuration.
    pub emoji: EmojiConfig,
    /// `PlantUML` language processor configuration.
    pub plantuml: PlantUmlConfig,
    /// Template language processor configuration.
    pub template: TemplateConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    pub gfm: bool,
    /// Render single newlines as `<br>`.
    pub breaks: bool,
    /// Syntax-highlight fenced code.
    pub highlight: bool,
    /// Sanitize the rendered HTML.
    pub sanitize: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: true,
            highlight: true,
            sanitize: true,
        }
    }
}

/// Math configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// Whether `$$…$$` formulas are marked up for typesetting.
    pub enabled: bool,
}

/// Emoji configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// Whether `:shortcode:` is replaced with emoji.
    pub enabled: bool,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `PlantUML` configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlantUmlConfig {
    /// Kroki-compatible server URL. Diagrams render as source when unset.
    pub server_url: Option<String>,
}

/// Template configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Name substituted for `{user}` in template page names.
    pub user: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`plantuml.server_url`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wk.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, taking precedence over config
    /// file values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// environment expansion fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd));
        Self::load_with(config_path, discovered.as_deref(), cli_settings)
    }

    fn load_with(
        config_path: Option<&Path>,
        discovered: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(path) = discovered {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(math_enabled) = settings.math_enabled {
            self.math.enabled = math_enabled;
        }
        if let Some(sanitize) = settings.sanitize {
            self.renderer.sanitize = sanitize;
        }
        if let Some(plantuml_url) = &settings.plantuml_url {
            self.plantuml.server_url = Some(plantuml_url.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref server_url) = self.plantuml.server_url {
            require_non_empty(server_url, "plantuml.server_url")?;
            require_http_url(server_url, "plantuml.server_url")?;
        }
        if let Some(ref user) = self.template.user {
            require_non_empty(user, "template.user")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.plantuml.server_url {
            self.plantuml.server_url = Some(expand::expand_env(url, "plantuml.server_url")?);
        }
        if let Some(ref user) = self.template.user {
            self.template.user = Some(expand::expand_env(user, "template.user")?);
        }
        Ok(())
    }
}
