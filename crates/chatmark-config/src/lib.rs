//! Configuration management for chatmark.
//!
//! Parses `chatmark.toml` files with serde and provides auto-discovery of the
//! config file in parent directories.
//!
//! ```toml
//! [render]
//! dialect = "slack"
//! list_indent = 2
//! message_ml_envelope = false
//!
//! [mentions]
//! dialect = "slack"
//! ```
//!
//! Dialect names are resolved while loading, so a misspelled dialect is a
//! load error rather than a render-time surprise.

use std::path::{Path, PathBuf};

use chatmark_model::{Dialect, UnsupportedDialectError};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "chatmark.toml";

/// Largest accepted `render.list_indent`.
const MAX_LIST_INDENT: usize = 8;

/// Raw file contents, dialects still as names.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    render: RenderConfigRaw,
    mentions: MentionsConfigRaw,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RenderConfigRaw {
    dialect: Option<String>,
    list_indent: Option<usize>,
    message_ml_envelope: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MentionsConfigRaw {
    dialect: Option<String>,
}

/// Resolved configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Rendering defaults.
    pub render: RenderConfig,
    /// Mention extraction defaults.
    pub mentions: MentionsConfig,
    /// Path to the config file (set after loading from a file).
    pub config_path: Option<PathBuf>,
}

/// `[render]` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Default target dialect.
    pub dialect: Dialect,
    /// Spaces per nesting level for text-layout lists.
    pub list_indent: usize,
    /// Wrap Symphony output in `<messageML>`.
    pub message_ml_envelope: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::GenericMarkdown,
            list_indent: 2,
            message_ml_envelope: false,
        }
    }
}

/// `[mentions]` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionsConfig {
    /// Default source dialect for extraction.
    pub dialect: Dialect,
}

impl Default for MentionsConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::GenericMarkdown,
        }
    }
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
    /// A dialect name that does not resolve.
    #[error("Configuration error: {0}")]
    Dialect(#[from] UnsupportedDialectError),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that path. Otherwise,
    /// searches for `chatmark.toml` in the current directory and its
    /// parents, falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit path does not exist, or the file
    /// cannot be read, parsed or validated.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Search `start` and its parents for `chatmark.toml`.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys,
    /// `ConfigError::Dialect` for unknown dialect names and
    /// `ConfigError::Validation` for out-of-range values.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Self::resolve(file)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), dialect = %config.render.dialect, "Loaded configuration");
        Ok(config)
    }

    fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = RenderConfig::default();
        let render_dialect = match file.render.dialect {
            Some(name) => name.parse::<Dialect>()?,
            None => defaults.dialect,
        };
        let mentions_dialect = match file.mentions.dialect {
            Some(name) => name.parse::<Dialect>()?,
            None => render_dialect,
        };
        let config = Self {
            render: RenderConfig {
                dialect: render_dialect,
                list_indent: file.render.list_indent.unwrap_or(defaults.list_indent),
                message_ml_envelope: file
                    .render
                    .message_ml_envelope
                    .unwrap_or(defaults.message_ml_envelope),
            },
            mentions: MentionsConfig {
                dialect: mentions_dialect,
            },
            config_path: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `render.list_indent` is outside
    /// `1..=8`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LIST_INDENT).contains(&self.render.list_indent) {
            return Err(ConfigError::Validation(format!(
                "render.list_indent must be between 1 and {MAX_LIST_INDENT}"
            )));
        }
        Ok(())
    }
}
