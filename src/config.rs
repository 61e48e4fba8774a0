//! Layered configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `venture-desk.toml` in the working directory
//! 3. Environment variables (`VENTURE_DESK_*`, `__` separates nested keys)
//!
//! Command-line flags override the merged result in `main`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::profile::{Checklist, ENHANCEMENT_FIELDS, REQUIRED_FIELDS};

pub const CONFIG_FILE: &str = "venture-desk.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

fn default_dataset() -> PathBuf {
    PathBuf::from("venture-desk.json")
}

const fn default_preview_limit() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileConfig {
    #[serde(default = "default_required")]
    pub required_fields: Vec<String>,
    #[serde(default = "default_enhancement")]
    pub enhancement_fields: Vec<String>,
}

fn default_required() -> Vec<String> {
    REQUIRED_FIELDS.iter().map(|field| field.to_string()).collect()
}

fn default_enhancement() -> Vec<String> {
    ENHANCEMENT_FIELDS.iter().map(|field| field.to_string()).collect()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            required_fields: default_required(),
            enhancement_fields: default_enhancement(),
        }
    }
}

impl ProfileConfig {
    pub fn checklist(&self) -> Checklist {
        Checklist {
            required: self.required_fields.clone(),
            enhancement: self.enhancement_fields.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeskConfig {
    /// Dataset JSON read by every view command.
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,

    /// Deals listed per stage by `pipeline`.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    #[serde(default)]
    pub profile: ProfileConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            preview_limit: default_preview_limit(),
            profile: ProfileConfig::default(),
        }
    }
}

impl DeskConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))
    }

    pub fn figment(config_file: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if config_file.exists() {
            figment = figment.merge(Toml::file(config_file));
        }
        figment.merge(Env::prefixed("VENTURE_DESK_").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.profile.required_fields.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "profile.required_fields".to_string(),
                reason: "at least one field is required".to_string(),
            });
        }
        Ok(())
    }
}
