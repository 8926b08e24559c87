//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Error;
use crate::domain::listing::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::search::{
    FALLBACK_PREVIEW_LENGTH, HIGHLIGHT_PREFIX, HIGHLIGHT_SUFFIX, MAX_KEYWORD_LENGTH, MAX_SNIPPETS,
    SNIPPET_CONTEXT_LENGTH, SnippetOptions,
};

/// Tilex configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub search: SearchConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub context_length: usize,
    pub max_snippets: usize,
    pub fallback_length: usize,
    pub max_keyword_length: usize,
    pub highlight_prefix: String,
    pub highlight_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                path: crate::storage::database::default_database_path(),
                max_connections: 5,
            },
            search: SearchConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_length: SNIPPET_CONTEXT_LENGTH,
            max_snippets: MAX_SNIPPETS,
            fallback_length: FALLBACK_PREVIEW_LENGTH,
            max_keyword_length: MAX_KEYWORD_LENGTH,
            highlight_prefix: HIGHLIGHT_PREFIX.to_string(),
            highlight_suffix: HIGHLIGHT_SUFFIX.to_string(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl SearchConfig {
    /// Build snippet extraction options from these settings
    pub fn snippet_options(&self) -> SnippetOptions {
        SnippetOptions {
            context_length: self.context_length,
            max_snippets: self.max_snippets,
            fallback_length: self.fallback_length,
            highlight_prefix: self.highlight_prefix.clone(),
            highlight_suffix: self.highlight_suffix.clone(),
            ..SnippetOptions::default()
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("TILEX_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("tilex")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            config_error(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.max_connections == 0 {
            return Err(config_error("database.max_connections must be at least 1"));
        }
        if self.search.context_length > SNIPPET_CONTEXT_LENGTH {
            return Err(config_error(format!(
                "search.context_length must be at most {}",
                SNIPPET_CONTEXT_LENGTH
            )));
        }
        if !(1..=MAX_SNIPPETS).contains(&self.search.max_snippets) {
            return Err(config_error(format!(
                "search.max_snippets must be between 1 and {}",
                MAX_SNIPPETS
            )));
        }
        if self.search.max_keyword_length == 0 {
            return Err(config_error("search.max_keyword_length must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.listing.max_page_size) {
            return Err(config_error(format!(
                "listing.max_page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if !(1..=self.listing.max_page_size).contains(&self.listing.default_page_size) {
            return Err(config_error(format!(
                "listing.default_page_size must be between 1 and {}",
                self.listing.max_page_size
            )));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "database.path" => Ok(self.database.path.display().to_string()),
            "database.max_connections" => Ok(self.database.max_connections.to_string()),

            "search.context_length" => Ok(self.search.context_length.to_string()),
            "search.max_snippets" => Ok(self.search.max_snippets.to_string()),
            "search.fallback_length" => Ok(self.search.fallback_length.to_string()),
            "search.max_keyword_length" => Ok(self.search.max_keyword_length.to_string()),
            "search.highlight_prefix" => Ok(self.search.highlight_prefix.clone()),
            "search.highlight_suffix" => Ok(self.search.highlight_suffix.clone()),

            "listing.default_page_size" => Ok(self.listing.default_page_size.to_string()),
            "listing.max_page_size" => Ok(self.listing.max_page_size.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `tilex config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "database.path" => {
                self.database.path = PathBuf::from(value);
            }
            "database.max_connections" => {
                let max: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid max_connections value: {}", value))?;
                if max == 0 {
                    return Err(config_error("max_connections must be at least 1"));
                }
                self.database.max_connections = max;
            }

            "search.context_length" => {
                let length: usize = value
                    .parse()
                    .with_context(|| format!("Invalid context_length value: {}", value))?;
                if length > SNIPPET_CONTEXT_LENGTH {
                    return Err(config_error(format!(
                        "context_length must be at most {}",
                        SNIPPET_CONTEXT_LENGTH
                    )));
                }
                self.search.context_length = length;
            }
            "search.max_snippets" => {
                let max: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_snippets value: {}", value))?;
                if !(1..=MAX_SNIPPETS).contains(&max) {
                    return Err(config_error(format!(
                        "max_snippets must be between 1 and {}",
                        MAX_SNIPPETS
                    )));
                }
                self.search.max_snippets = max;
            }
            "search.fallback_length" => {
                self.search.fallback_length = value
                    .parse()
                    .with_context(|| format!("Invalid fallback_length value: {}", value))?;
            }
            "search.max_keyword_length" => {
                let max: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_keyword_length value: {}", value))?;
                if max == 0 {
                    return Err(config_error("max_keyword_length must be at least 1"));
                }
                self.search.max_keyword_length = max;
            }
            "search.highlight_prefix" => {
                self.search.highlight_prefix = value.to_string();
            }
            "search.highlight_suffix" => {
                self.search.highlight_suffix = value.to_string();
            }

            "listing.default_page_size" => {
                let size: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid default_page_size value: {}", value))?;
                if !(1..=self.listing.max_page_size).contains(&size) {
                    return Err(config_error(format!(
                        "default_page_size must be between 1 and {}",
                        self.listing.max_page_size
                    )));
                }
                self.listing.default_page_size = size;
            }
            "listing.max_page_size" => {
                let size: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid max_page_size value: {}", value))?;
                if size > MAX_PAGE_SIZE {
                    return Err(config_error(format!(
                        "max_page_size must be at most {}",
                        MAX_PAGE_SIZE
                    )));
                }
                if size < self.listing.default_page_size {
                    return Err(config_error(format!(
                        "max_page_size must be at least default_page_size ({})",
                        self.listing.default_page_size
                    )));
                }
                self.listing.max_page_size = size;
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `tilex config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "database.path",
            "database.max_connections",
            "search.context_length",
            "search.max_snippets",
            "search.fallback_length",
            "search.max_keyword_length",
            "search.highlight_prefix",
            "search.highlight_suffix",
            "listing.default_page_size",
            "listing.max_page_size",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Wrap a rejected setting as [`Error::ConfigError`] so callers can downcast it
fn config_error(message: impl Into<String>) -> anyhow::Error {
    Error::ConfigError(message.into()).into()
}
