//! Layered configuration loading for fitlog using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FITLOG_*` prefix, `__` as separator)
//! 2. Project-local `fitlog.toml`
//! 3. User-level `~/.config/fitlog/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `FITLOG_STORAGE__DATA_DIR` -> `storage.data_dir`,
//! `FITLOG_GENERAL__DEFAULT_USER` -> `general.default_user`.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FitConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Where month files, weight logs, and the profile live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Display name used when no profile has been saved yet.
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_user() -> String {
    "Nary".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

impl FitConfig {
    /// Load configuration from all sources (TOML files + environment).
    ///
    /// # Errors
    ///
    /// Returns a figment extraction error when a source is present but
    /// malformed.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Build the figment provider chain. Public so tests can layer extra
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("fitlog.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FITLOG_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fitlog").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_usable() {
        let config = FitConfig::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.general.default_user, "Nary");
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FITLOG_STORAGE__DATA_DIR", "/srv/fitlog");
            jail.set_env("FITLOG_GENERAL__DEFAULT_USER", "Mai");

            let config: FitConfig = FitConfig::figment().extract()?;
            assert_eq!(config.storage.data_dir, PathBuf::from("/srv/fitlog"));
            assert_eq!(config.general.default_user, "Mai");
            Ok(())
        });
    }
}
