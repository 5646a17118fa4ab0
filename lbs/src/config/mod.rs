//! Configuration file handling.
//!
//! Provider credentials and HTTP settings live in an INI file, by default
//! `~/.lbs/config.ini`. The `LBS_CONFIG` environment variable points to an
//! alternative file.
//!
//! ```ini
//! [http]
//! timeout = 30
//!
//! [amap]
//! key = your-amap-key
//! sig_key = your-private-key
//!
//! [baidu]
//! ak = your-baidu-ak
//!
//! [qq]
//! key = your-qq-key
//! ```
//!
//! A missing file yields the defaults; unknown sections and keys are ignored.

mod keys;

pub use keys::ConfigKey;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "LBS_CONFIG";

/// Errors from loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A provider command was run without its credential configured.
    #[error("{0} is not set. Use 'lbs config set {0} <value>' to configure it")]
    MissingCredential(&'static str),
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[amap]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmapSettings {
    pub key: Option<String>,
    /// Private key for request signatures, when enabled for the application.
    pub sig_key: Option<String>,
}

/// `[baidu]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaiduSettings {
    pub ak: Option<String>,
}

/// `[qq]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QqSettings {
    pub key: Option<String>,
}

/// In-memory form of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub http: HttpSettings,
    pub amap: AmapSettings,
    pub baidu: BaiduSettings,
    pub qq: QqSettings,
}

impl ConfigFile {
    /// Loads from [`config_file_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`, returning defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(err) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Saves to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Writes all set values to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini.write_to_file(path).map_err(io_error)?;

        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }
}

/// Location of the configuration file.
///
/// `$LBS_CONFIG` when set, otherwise `~/.lbs/config.ini`. Falls back to the
/// current directory when no home directory can be determined.
pub fn config_file_path() -> PathBuf {
    resolve_config_path(std::env::var_os(CONFIG_ENV_VAR), dirs::home_dir())
}

fn resolve_config_path(override_path: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    match override_path.filter(|p| !p.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lbs")
            .join("config.ini"),
    }
}
