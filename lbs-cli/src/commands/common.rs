//! Common utilities shared across CLI commands.

use lbs::config::{ConfigFile, ConfigKey};
use lbs::provider::{AmapClient, BaiduMapClient, QQMapClient, ReqwestClient};
use serde_json::Value;

use crate::error::CliError;

/// Loads the config file, falling back to defaults if it cannot be read.
pub fn load_config() -> ConfigFile {
    ConfigFile::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable config file");
        ConfigFile::default()
    })
}

fn http_client(config: &ConfigFile) -> Result<ReqwestClient, CliError> {
    Ok(ReqwestClient::with_timeout(config.http.timeout_secs)?)
}

pub fn amap_client(config: &ConfigFile) -> Result<AmapClient<ReqwestClient>, CliError> {
    let key = ConfigKey::AmapKey.require(config)?;
    let client = AmapClient::new(http_client(config)?, key);
    Ok(match &config.amap.sig_key {
        Some(sig_key) => client.with_sig_key(sig_key.clone()),
        None => client,
    })
}

pub fn baidu_client(config: &ConfigFile) -> Result<BaiduMapClient<ReqwestClient>, CliError> {
    let ak = ConfigKey::BaiduAk.require(config)?;
    Ok(BaiduMapClient::new(http_client(config)?, ak))
}

pub fn qq_client(config: &ConfigFile) -> Result<QQMapClient<ReqwestClient>, CliError> {
    let key = ConfigKey::QqKey.require(config)?;
    Ok(QQMapClient::new(http_client(config)?, key))
}

/// Pretty-prints a JSON response to stdout.
pub fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses a `name=value` query parameter argument.
pub fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", arg)),
    }
}
