//! Configuration module for the chooser
//!
//! Holds the source sites that can be browsed plus session defaults.
//! Configuration is stored as TOML in the user's config directory and can
//! be overridden per run with `CHOOSER_*` environment variables
//! (`CHOOSER_TIMEOUT_SECS=10`, `CHOOSER_DEFAULT_SOURCE=staging`).

mod setup;

pub use setup::{first_time_setup, validate_base_url};

use crate::api;
use crate::resource::{PageId, TypeFilter};
use crate::session::DEFAULT_ROOT_PAGE_ID;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "CHOOSER";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PAGES_ENDPOINT: &str = "api/chooser/pages/";
const DEFAULT_MODELS_ENDPOINT: &str = "api/chooser/models/";

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_root_page_id() -> u64 {
    DEFAULT_ROOT_PAGE_ID.0
}

fn default_pages_endpoint() -> String {
    DEFAULT_PAGES_ENDPOINT.to_string()
}

fn default_models_endpoint() -> String {
    DEFAULT_MODELS_ENDPOINT.to_string()
}

/// One source site
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL of the site, e.g. `https://staging.example.com`
    pub base_url: String,

    /// Page listing endpoint, relative to `base_url` or absolute
    #[serde(default = "default_pages_endpoint")]
    pub pages_endpoint: String,

    /// Model listing endpoint, relative to `base_url` or absolute
    #[serde(default = "default_models_endpoint")]
    pub models_endpoint: String,
}

impl SourceConfig {
    /// Source with the default endpoint paths
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            pages_endpoint: default_pages_endpoint(),
            models_endpoint: default_models_endpoint(),
        }
    }

    #[must_use]
    pub fn pages_url(&self) -> String {
        api::endpoint_url(&self.base_url, &self.pages_endpoint)
    }

    #[must_use]
    pub fn models_url(&self) -> String {
        api::endpoint_url(&self.base_url, &self.models_endpoint)
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChooserConfig {
    /// Map of source names to their sites
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,

    /// The source to use when none is specified
    #[serde(default)]
    pub default_source: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page id the source treats as the tree root
    #[serde(default = "default_root_page_id")]
    pub root_page_id: u64,

    /// Page types the page chooser may pick by default
    #[serde(default)]
    pub restrict_page_types: Vec<String>,
}

impl Default for ChooserConfig {
    fn default() -> Self {
        Self {
            sources: BTreeMap::new(),
            default_source: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            root_page_id: DEFAULT_ROOT_PAGE_ID.0,
            restrict_page_types: Vec::new(),
        }
    }
}

impl ChooserConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("transfer-chooser").join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path` layered with `CHOOSER_*` variables
    ///
    /// A missing file yields the defaults (still subject to the environment).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an environment value cannot be
    /// parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("restrict_page_types")
    }

    fn load_layered(path: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(environment)
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            first_time_setup(&config_path)
        }
    }

    /// Add or replace a source; the first source added becomes the default
    pub fn add_source(&mut self, name: String, source: SourceConfig) {
        if self.default_source.is_none() {
            self.default_source = Some(name.clone());
        }
        self.sources.insert(name, source);
    }

    /// Remove a source, clearing the default if it pointed there
    pub fn remove_source(&mut self, name: &str) -> Option<SourceConfig> {
        let removed = self.sources.remove(name);
        if self.default_source.as_deref() == Some(name) {
            self.default_source = None;
        }
        removed
    }

    #[must_use]
    pub fn get_source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.get(name)
    }

    /// Source names in sorted order
    #[must_use]
    pub fn list_sources(&self) -> Vec<&String> {
        self.sources.keys().collect()
    }

    /// Set the default source
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the source name doesn't exist in the configuration.
    pub fn set_default_source(&mut self, name: String) -> Result<(), ConfigError> {
        if !self.sources.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Source '{name}' does not exist in configuration"
            )));
        }
        self.default_source = Some(name);
        Ok(())
    }

    /// Source to browse: `name` if given, else the default, else the only one
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the named source is unknown or no source can
    /// be picked unambiguously.
    pub fn resolve_source<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a SourceConfig), ConfigError> {
        let name = match (name, self.default_source.as_deref()) {
            (Some(name), _) | (None, Some(name)) => name,
            (None, None) if self.sources.len() == 1 => {
                return self
                    .sources
                    .iter()
                    .next()
                    .map(|(name, source)| (name.as_str(), source))
                    .ok_or_else(|| ConfigError::Message("No sources configured".to_string()));
            }
            (None, None) if self.sources.is_empty() => {
                return Err(ConfigError::Message(
                    "No sources configured. Add one with `chooser sources add`".to_string(),
                ));
            }
            (None, None) => {
                return Err(ConfigError::Message(
                    "Several sources are configured; pass --source or set a default".to_string(),
                ));
            }
        };

        self.sources
            .get(name)
            .map(|source| (name, source))
            .ok_or_else(|| ConfigError::Message(format!("Source '{name}' not found in configuration")))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn root_page_id(&self) -> PageId {
        PageId(self.root_page_id)
    }

    /// Normalized default page type filter
    #[must_use]
    pub fn type_filter(&self) -> Option<TypeFilter> {
        TypeFilter::new(&self.restrict_page_types)
    }
}
