//! Settable configuration keys in `section.key` form.

use std::fmt;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};

/// A configuration setting addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    HttpTimeout,
    AmapKey,
    AmapSigKey,
    BaiduAk,
    QqKey,
}

const ALL_KEYS: [ConfigKey; 5] = [
    ConfigKey::HttpTimeout,
    ConfigKey::AmapKey,
    ConfigKey::AmapSigKey,
    ConfigKey::BaiduAk,
    ConfigKey::QqKey,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// Full name, e.g. `amap.sig_key`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::HttpTimeout => "http.timeout",
            ConfigKey::AmapKey => "amap.key",
            ConfigKey::AmapSigKey => "amap.sig_key",
            ConfigKey::BaiduAk => "baidu.ak",
            ConfigKey::QqKey => "qq.key",
        }
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        self.name().split_once('.').map_or("", |(section, _)| section)
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        self.name().split_once('.').map_or("", |(_, key)| key)
    }

    /// Current value rendered as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::HttpTimeout => config.http.timeout_secs.to_string(),
            ConfigKey::AmapKey => config.amap.key.clone().unwrap_or_default(),
            ConfigKey::AmapSigKey => config.amap.sig_key.clone().unwrap_or_default(),
            ConfigKey::BaiduAk => config.baidu.ak.clone().unwrap_or_default(),
            ConfigKey::QqKey => config.qq.key.clone().unwrap_or_default(),
        }
    }

    /// Parses and stores `value`. An empty value clears an optional setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = (!value.is_empty()).then(|| value.to_string());

        match self {
            ConfigKey::HttpTimeout => {
                let secs: u64 = value.parse().map_err(|_| self.invalid(value, "expected whole seconds"))?;
                if secs == 0 {
                    return Err(self.invalid(value, "timeout must be at least 1 second"));
                }
                config.http.timeout_secs = secs;
            }
            ConfigKey::AmapKey => config.amap.key = optional,
            ConfigKey::AmapSigKey => config.amap.sig_key = optional,
            ConfigKey::BaiduAk => config.baidu.ak = optional,
            ConfigKey::QqKey => config.qq.key = optional,
        }
        Ok(())
    }

    /// Returns the value, or [`ConfigError::MissingCredential`] when unset.
    pub fn require(&self, config: &ConfigFile) -> Result<String, ConfigError> {
        let value = self.get(config);
        if value.is_empty() {
            return Err(ConfigError::MissingCredential(self.name()));
        }
        Ok(value)
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
