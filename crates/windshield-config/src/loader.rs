//! Resolves and reads the configuration file.
//!
//! Precedence, highest first:
//!
//! 1. the file named by `WINDSHIELD_CONFIG_PATH` (must exist);
//! 2. the file the loader was built with, normally `windshield.toml` beside
//!    the plugin (skipped when absent);
//! 3. built-in defaults.
//!
//! `WINDSHIELD_LOG_FILTER` then overrides `log_filter` regardless of source.

use std::env;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

use crate::defaults::{CONFIG_FILE_NAME, CONFIG_PATH_ENV, LOG_FILTER_ENV};
use crate::{Config, ConfigError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader {
    /// Loads and validates the plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a file cannot be read or parsed, or when
    /// the resolved values are invalid.
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

/// Loader reading TOML from disk with environment overrides.
#[derive(Debug, Clone, Default)]
pub struct FileConfigLoader {
    path: Option<Utf8PathBuf>,
}

impl FileConfigLoader {
    /// Reads the given file when it exists.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Uses only the environment and built-in defaults.
    #[must_use]
    pub const fn without_file() -> Self {
        Self { path: None }
    }

    /// Looks for `windshield.toml` in the plugin's folder.
    ///
    /// `plugin_file` is the path of the loaded plugin binary. Plugins ship as
    /// `<folder>/<platform>_x64/<name>.xpl`, so the file is searched in the
    /// folder above the platform directory when there is one.
    #[must_use]
    pub fn beside_plugin(plugin_file: &Utf8Path) -> Self {
        Self::new(plugin_folder(plugin_file).join(CONFIG_FILE_NAME))
    }

    /// The file this loader falls back to when no override is set.
    #[must_use]
    pub fn default_path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        let mut config = match env_value(CONFIG_PATH_ENV) {
            Some(explicit) => read_config(Utf8Path::new(&explicit))?,
            None => match self.path.as_deref() {
                Some(path) => read_optional_config(path)?,
                None => Config::default(),
            },
        };

        if let Some(filter) = env_value(LOG_FILTER_ENV) {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn read_optional_config(path: &Utf8Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_config(path, &text),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_config(path: &Utf8Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &text)
}

fn parse_config(path: &Utf8Path, text: &str) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn plugin_folder(plugin_file: &Utf8Path) -> Utf8PathBuf {
    let Some(parent) = plugin_file.parent() else {
        return Utf8PathBuf::new();
    };
    let is_platform_dir = parent
        .file_name()
        .is_some_and(|name| name.ends_with("_x64") || name.ends_with("_arm64"));
    match parent.parent() {
        Some(folder) if is_platform_dir => folder.to_path_buf(),
        _ => parent.to_path_buf(),
    }
}
