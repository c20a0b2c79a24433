//! Application configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `config.toml` in the platform config dir (or the file given by `--config`)
//! 3. environment: `VIBEFLICKS_CATALOG`, `VIBEFLICKS_THEME`, `VIBEFLICKS_LOG`
//! 4. command-line flags (applied by the caller)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::DEFAULT_CATALOG_FILE;
use crate::ui::components::theme::ThemeMode;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid theme {0:?} (expected `light` or `dark`)")]
    Theme(String),
}

/// On-disk shape; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    catalog: Option<PathBuf>,
    theme: Option<ThemeMode>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog: PathBuf,
    pub theme: ThemeMode,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_FILE),
            theme: ThemeMode::Light,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        match path {
            Some(p) => config.merge_file(p)?,
            None => {
                if let Some(p) = default_config_path().filter(|p| p.exists()) {
                    config.merge_file(&p)?;
                }
            }
        }
        config.apply_env()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(catalog) = file.catalog {
            self.catalog = catalog;
        }
        if let Some(theme) = file.theme {
            self.theme = theme;
        }
        if file.log_level.is_some() {
            self.log_level = file.log_level;
        }
        tracing::debug!(path = %path.display(), "config_loaded");
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(catalog) = dotenvy::var("VIBEFLICKS_CATALOG") {
            self.catalog = PathBuf::from(catalog);
        }
        if let Ok(theme) = dotenvy::var("VIBEFLICKS_THEME") {
            self.theme = theme.parse().map_err(|_| ConfigError::Theme(theme))?;
        }
        if let Ok(level) = dotenvy::var("VIBEFLICKS_LOG") {
            self.log_level = Some(level);
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "vibeflicks", "vibeflicks")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
