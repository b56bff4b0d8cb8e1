//! Configuration management for Tessera.
//!
//! Parses `tessera.toml` configuration files with serde and provides
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
//! - `source.document`
//! - `render.root_path`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tessera_content::TextAlign;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the document to operate on.
    pub document: Option<PathBuf>,
    /// Override the address root path.
    pub root_path: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tessera.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document source (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Spacing class names.
    pub spacing: SpacingConfig,
    /// Anchor regeneration timing.
    pub anchors: AnchorsConfig,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw source configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourceConfigRaw {
    document: Option<String>,
}

/// Resolved source configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// Document file, if configured.
    pub document: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Root path of top-level node addresses.
    pub root_path: String,
    /// HTML attribute carrying node addresses.
    pub address_attribute: String,
    /// Heading level for top-level titled containers.
    pub heading_base_level: u8,
    /// Alignment of nodes without an explicit setting.
    pub default_align: TextAlign,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            root_path: "content".to_owned(),
            address_attribute: "data-content-path".to_owned(),
            heading_base_level: 2,
            default_align: TextAlign::Left,
        }
    }
}

/// Spacing class names.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Class between ordinary siblings.
    pub standard: String,
    /// Class before a structural container.
    pub large: String,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            standard: "spacing-standard".to_owned(),
            large: "spacing-large".to_owned(),
        }
    }
}

/// Anchor regeneration timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnchorsConfig {
    /// Quiet period after a title edit before regenerating.
    pub debounce_ms: u64,
    /// Ceiling on the "regenerating" state.
    pub safety_timeout_ms: u64,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            safety_timeout_ms: 5000,
        }
    }
}

impl AnchorsConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.safety_timeout_ms)
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.document`").
        field: String,
        /// Error message (e.g., "${`CONTENT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tessera.toml` in the current directory and
    /// its parents, falling back to defaults.
    ///
    /// CLI settings are applied after loading, so they take precedence over
    /// file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if parsing,
    /// expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
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
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(document) = &settings.document {
            self.source_resolved.document = Some(document.clone());
        }
        if let Some(root_path) = &settings.root_path {
            self.render.root_path.clone_from(root_path);
        }
    }

    /// Search for a config file in `start` and its parents.
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

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_spacing()?;
        self.validate_anchors()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.root_path, "render.root_path")?;
        require_non_empty(&self.render.address_attribute, "render.address_attribute")?;

        let level = self.render.heading_base_level;
        if !(1..=6).contains(&level) {
            return Err(ConfigError::Validation(format!(
                "render.heading_base_level must be between 1 and 6, got {level}"
            )));
        }
        Ok(())
    }

    fn validate_spacing(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.spacing.standard, "spacing.standard")?;
        require_non_empty(&self.spacing.large, "spacing.large")?;
        Ok(())
    }

    fn validate_anchors(&self) -> Result<(), ConfigError> {
        if self.anchors.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "anchors.debounce_ms must be greater than 0".to_owned(),
            ));
        }
        if self.anchors.safety_timeout_ms <= self.anchors.debounce_ms {
            return Err(ConfigError::Validation(
                "anchors.safety_timeout_ms must be greater than anchors.debounce_ms".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref document) = self.source.document {
            self.source.document = Some(expand::expand_env(document, "source.document")?);
        }
        self.render.root_path = expand::expand_env(&self.render.root_path, "render.root_path")?;
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.source_resolved = SourceConfig {
            document: self.source.document.as_deref().map(|d| config_dir.join(d)),
        };
    }
}
