//! Configuration for the quill CLI.
//!
//! Parses `quill.toml` with serde and discovers it in the current directory
//! or its parents. CLI settings are applied on top via [`CliSettings`].
//!
//! ```toml
//! extensions = ["tables", "footnotes"]
//!
//! [html]
//! flags = ["use-xhtml"]
//! footnote_offset = 0
//! toc_level = 3
//! ```

use std::path::{Path, PathBuf};

use quill_render::{Extensions, HtmlFlags};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-empty lists and non-None values override the loaded config.
#[derive(Debug, Default)]
pub(crate) struct CliSettings {
    /// Override enabled extensions.
    pub extensions: Vec<String>,
    /// Override HTML flags.
    pub html_flags: Vec<String>,
    /// Override footnote numbering offset.
    pub footnote_offset: Option<u32>,
    /// Override header anchor level.
    pub toc_level: Option<u8>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Deepest header level.
const MAX_HEADER_LEVEL: u8 = 6;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Extension names, see [`Extensions::names`].
    pub extensions: Vec<String>,
    /// HTML output settings.
    pub html: HtmlConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[html]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct HtmlConfig {
    /// Flag names, see [`HtmlFlags::names`].
    pub flags: Vec<String>,
    /// Added to every footnote number.
    pub footnote_offset: u32,
    /// Headers up to this level get `toc_N` anchors; 0 disables them.
    pub toc_level: u8,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
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
}

/// Resolve a list of names into flags, rejecting unknown names.
fn resolve_names<F>(names: &[String], field: &str, lookup: impl Fn(&str) -> Option<F>) -> Result<F, ConfigError>
where
    F: Default + std::ops::BitOr<Output = F>,
{
    names.iter().try_fold(F::default(), |acc, name| {
        lookup(name)
            .map(|flag| acc | flag)
            .ok_or_else(|| ConfigError::Validation(format!("{field}: unknown name '{name}'")))
    })
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents,
    /// falling back to defaults.
    pub(crate) fn load(config_path: Option<&Path>, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        tracing::debug!(path = ?config.config_path, "Loaded configuration");
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if !settings.extensions.is_empty() {
            self.extensions.clone_from(&settings.extensions);
        }
        if !settings.html_flags.is_empty() {
            self.html.flags.clone_from(&settings.html_flags);
        }
        if let Some(offset) = settings.footnote_offset {
            self.html.footnote_offset = offset;
        }
        if let Some(level) = settings.toc_level {
            self.html.toc_level = level;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
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
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.extensions()?;
        self.html_flags()?;
        if self.html.toc_level > MAX_HEADER_LEVEL {
            return Err(ConfigError::Validation(format!(
                "html.toc_level must be between 0 and {MAX_HEADER_LEVEL}"
            )));
        }
        Ok(())
    }

    /// Enabled extensions.
    pub(crate) fn extensions(&self) -> Result<Extensions, ConfigError> {
        resolve_names(&self.extensions, "extensions", Extensions::from_config_name)
    }

    /// HTML flags.
    pub(crate) fn html_flags(&self) -> Result<HtmlFlags, ConfigError> {
        resolve_names(&self.html.flags, "html.flags", HtmlFlags::from_config_name)
    }

    /// Deepest header level listed in a table of contents.
    pub(crate) fn toc_nesting_level(&self) -> u8 {
        if self.html.toc_level == 0 {
            MAX_HEADER_LEVEL
        } else {
            self.html.toc_level
        }
    }
}
