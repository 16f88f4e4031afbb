//! # Trafikvakt Configuration System
//!
//! Hierarchical configuration for the analytics engine. Every lookback and
//! threshold the dashboard's original queries hard-coded — inconsistently,
//! across near-duplicate views — is an explicit named default here, so
//! production owners override them in one place instead of hunting
//! constants.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod engine;
mod error;
mod validation;
mod views;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use views::ViewDefaults;

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct TrafikvaktConfig {
    /// Engine-wide parameters (interval width, cache TTL, query timeout).
    #[validate(nested)]
    pub engine: EngineConfig,

    /// Per-view default windows and thresholds.
    #[validate(nested)]
    pub views: ViewDefaults,
}

impl TrafikvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/trafikvakt.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides.
    /// 4. `TRAFIKVAKT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(TrafikvaktConfig::default()));

        if Path::new("config/trafikvakt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/trafikvakt.yaml"));
        }

        let env = std::env::var("TRAFIKVAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed("TRAFIKVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::from(Serialized::defaults(TrafikvaktConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TRAFIKVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
