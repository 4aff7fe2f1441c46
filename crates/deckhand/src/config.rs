//! Configuration file loading and parsing.
//!
//! Deckhand reads an optional `deckhand.toml`. Every section and field is
//! optional; getters fall back to the built-in defaults, and command-line flags
//! override whatever the file says.

use crate::engine::{
    Thresholds, ValidateOptions, DEFAULT_MAX_BULLETS, DEFAULT_MAX_PARAGRAPH_WORDS,
    DEFAULT_MAX_WORDS, DEFAULT_REQUIRED_KEYS, DEFAULT_TOP,
};
use crate::scaffold::{DEFAULT_DATE, DEFAULT_SUBTITLE, DEFAULT_TITLE};
use regex::Regex;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Config file name looked up inside the projects directory.
pub const CONFIG_FILE: &str = "deckhand.toml";

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("frontmatter key pattern"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Root configuration structure loaded from `deckhand.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckhandConfig {
    /// Validation thresholds and rules (optional).
    pub validate: Option<ValidateConfig>,
    /// Asset audit settings (optional).
    pub audit: Option<AuditConfig>,
    /// Starter document defaults (optional).
    pub scaffold: Option<ScaffoldConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateConfig {
    /// Words per slide before warning (default: 140).
    pub max_words: Option<usize>,
    /// Bullets per slide before warning (default: 8).
    pub max_bullets: Option<usize>,
    /// Words in the longest paragraph before warning (default: 55).
    pub max_paragraph_words: Option<usize>,
    /// Frontmatter keys that must have a value (default: ["project", "title"]).
    pub required_keys: Option<Vec<String>>,
    /// Treat warnings as failures (default: false).
    pub strict: Option<bool>,
}

impl ValidateConfig {
    pub fn max_words(&self) -> usize {
        self.max_words.unwrap_or(DEFAULT_MAX_WORDS)
    }

    pub fn max_bullets(&self) -> usize {
        self.max_bullets.unwrap_or(DEFAULT_MAX_BULLETS)
    }

    pub fn max_paragraph_words(&self) -> usize {
        self.max_paragraph_words.unwrap_or(DEFAULT_MAX_PARAGRAPH_WORDS)
    }

    pub fn required_keys(&self) -> Vec<String> {
        self.required_keys
            .clone()
            .unwrap_or_else(|| DEFAULT_REQUIRED_KEYS.iter().map(|k| k.to_string()).collect())
    }

    pub fn strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Number of largest files to list (default: 10).
    pub top: Option<usize>,
    /// Fail when unused assets are found (default: false).
    pub strict_unused: Option<bool>,
}

impl AuditConfig {
    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }

    pub fn strict_unused(&self) -> bool {
        self.strict_unused.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaffoldConfig {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub date: Option<String>,
}

impl ScaffoldConfig {
    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn subtitle(&self) -> String {
        self.subtitle
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string())
    }

    pub fn date(&self) -> String {
        self.date.clone().unwrap_or_else(|| DEFAULT_DATE.to_string())
    }
}

impl DeckhandConfig {
    /// Load and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DeckhandConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate_fields()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` if it exists; otherwise return the all-defaults config.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    fn validate_fields(&self) -> Result<(), ConfigError> {
        if let Some(keys) = self.validate.as_ref().and_then(|v| v.required_keys.as_ref()) {
            if let Some(bad) = keys.iter().find(|key| !KEY_RE.is_match(key)) {
                return Err(ConfigError::Validation(format!(
                    "validate.required_keys entry '{bad}' must be a lowercase key matching [a-z0-9_-]+"
                )));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> ValidateConfig {
        self.validate.clone().unwrap_or_default()
    }

    pub fn audit(&self) -> AuditConfig {
        self.audit.clone().unwrap_or_default()
    }

    pub fn scaffold(&self) -> ScaffoldConfig {
        self.scaffold.clone().unwrap_or_default()
    }

    /// Validation options from the file, before command-line overrides.
    pub fn validate_options(&self) -> ValidateOptions {
        let section = self.validate();
        ValidateOptions {
            thresholds: Thresholds {
                max_words: section.max_words(),
                max_bullets: section.max_bullets(),
                max_paragraph_words: section.max_paragraph_words(),
            },
            required_keys: section.required_keys(),
        }
    }
}
