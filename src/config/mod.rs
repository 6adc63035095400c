//! Configuration module for taglens
//!
//! Settings are layered, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. the user file (`<config dir>/taglens/config.toml`)
//! 3. the project file (`<root>/.taglens.toml`)
//! 4. `TAGLENS_*` environment variables (`TAGLENS_EXPANSION__DEPTH=2`)

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::expand::ExpansionDepth;
use crate::output::ExpansionSettings;
use crate::tags::{AnnotationFormat, DEFAULT_MARKER, DEFAULT_MODULE_DECL};

/// Project-level config file name, looked up in the scanned root
pub const PROJECT_FILE: &str = ".taglens.toml";

const ENV_PREFIX: &str = "TAGLENS";

/// Dependency expansion defaults
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Expand the selection along symbol usage
    pub enabled: bool,
    /// Maximum hops from the selection (1..=5)
    pub depth: u8,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: ExpansionDepth::MIN,
        }
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LensConfig {
    /// Marker that starts an annotation line, before the `:`
    pub marker: String,

    /// Regex matching the module-declaration line annotations follow
    pub module_decl_pattern: String,

    /// Extension of the source files to index
    pub source_extension: String,

    pub expansion: ExpansionConfig,

    /// Suppress informational output by default
    pub quiet: bool,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            module_decl_pattern: DEFAULT_MODULE_DECL.to_string(),
            source_extension: "go".to_string(),
            expansion: ExpansionConfig::default(),
            quiet: false,
        }
    }
}

impl LensConfig {
    /// Get the path to the user config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn user_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("taglens").join("config.toml"))
    }

    /// Path of the project config file under `root`
    #[must_use]
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(PROJECT_FILE)
    }

    /// Load the layered configuration for the project at `root`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present config file cannot be parsed or a
    /// value has the wrong type.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let user = Self::user_config_path().ok();
        Self::load_from(user.as_deref(), &Self::project_config_path(root))
    }

    /// Load defaults, then the given files (each optional), then the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present config file cannot be parsed or a
    /// value has the wrong type.
    pub fn load_from(user: Option<&Path>, project: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(user) = user {
            builder = builder.add_source(File::from(user).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(File::from(project).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Save configuration to `path` as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
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

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }

    /// Annotation line format described by `marker` and `module_decl_pattern`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `module_decl_pattern` is not a valid regex.
    pub fn annotation_format(&self) -> Result<AnnotationFormat, ConfigError> {
        AnnotationFormat::new(self.marker.clone(), &self.module_decl_pattern).map_err(|e| {
            ConfigError::Message(format!(
                "Invalid module_decl_pattern '{}': {e}",
                self.module_decl_pattern
            ))
        })
    }

    /// Expansion settings with a validated depth
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `expansion.depth` is outside 1..=5.
    pub fn expansion_settings(&self) -> Result<ExpansionSettings, ConfigError> {
        let depth = ExpansionDepth::new(self.expansion.depth)
            .map_err(|e| ConfigError::Message(format!("expansion.depth: {e}")))?;
        Ok(ExpansionSettings {
            enabled: self.expansion.enabled,
            depth,
        })
    }
}
