//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coltree/coltree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `COLTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::IdStrategy;

/// Unified configuration for coltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Start new sessions with the fixed system columns
    pub seed_fixed_columns: bool,
    /// How new column ids are generated
    pub id_strategy: IdStrategy,
    /// Prefix for sequential ids
    pub sequential_prefix: String,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_fixed_columns: true,
            id_strategy: IdStrategy::default(),
            sequential_prefix: "col-".into(),
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed_fixed_columns: Option<bool>,
    pub id_strategy: Option<IdStrategy>,
    pub sequential_prefix: Option<String>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for coltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coltree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay values win where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed_fixed_columns: overlay
                .seed_fixed_columns
                .unwrap_or(self.seed_fixed_columns),
            id_strategy: overlay.id_strategy.unwrap_or(self.id_strategy),
            sequential_prefix: overlay
                .sequential_prefix
                .clone()
                .unwrap_or_else(|| self.sequential_prefix.clone()),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional file layered over the global config; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Load only defaults and one file, ignoring global config and environment.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        Ok(Self::default().merge_with(&load_raw_settings(path)?))
    }

    /// Apply COLTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("COLTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("seed_fixed_columns") {
            settings.seed_fixed_columns = val;
        }
        if let Ok(val) = config.get_string("id_strategy") {
            settings.id_strategy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("sequential_prefix") {
            settings.sequential_prefix = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/coltree/coltree.toml
#   Explicit: coltree --config <file>
#   Env:      COLTREE_* environment variables (e.g. COLTREE_ID_STRATEGY=uuid)

# Start new sessions with the fixed system columns (编号, 名称, 工料概要说明)
# seed_fixed_columns = true

# Column id generation: "timestamp", "uuid" or "sequential"
# id_strategy = "timestamp"

# Prefix for sequential ids
# sequential_prefix = "col-"

# Colored terminal output
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
