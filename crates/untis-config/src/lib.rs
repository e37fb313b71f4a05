//! # untis-config
//!
//! Layered configuration loading for the Untis client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`UNTIS_*` prefix, `__` as separator)
//! 2. Project-level `.untis/config.toml`
//! 3. User-level `~/.config/untis/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `UNTIS_SERVICE__SCHOOL` -> `service.school`,
//! `UNTIS_CREDENTIALS__PASSWORD` -> `credentials.password`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use untis_config::UntisConfig;
//!
//! let config = UntisConfig::load_with_dotenv().expect("config");
//! println!("endpoint: {}", config.service.endpoint());
//! ```

mod cache;
mod credentials;
mod error;
mod general;
mod service;

pub use cache::CacheConfig;
pub use credentials::CredentialsConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use service::ServiceConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UntisConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl UntisConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".untis/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("UNTIS_").split("__"));

        figment
    }

    /// Reject values that would produce an unusable endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "service.base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.service.school.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "service.school".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Credentials, or [`ConfigError::NotConfigured`] if either half is missing.
    pub fn require_credentials(&self) -> Result<&CredentialsConfig, ConfigError> {
        if self.credentials.is_configured() {
            Ok(&self.credentials)
        } else {
            Err(ConfigError::NotConfigured {
                section: "credentials".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("untis").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
