use super::{Config, ConfigError, Overrides, Settings};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["MACPROV_API_KEY", "MERAKI_DASHBOARD_API_KEY"];

/// Find config file in order of priority:
/// 1. Explicit --config flag path
/// 2. ./macprov.toml (current directory)
/// 3. ~/.config/macprov/macprov.toml
/// 4. ~/.macprov.toml
///
/// Returns `None` when no file exists; an explicit path that is missing is an error.
pub fn find_config_file(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let cwd_config = PathBuf::from("./macprov.toml");
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("macprov/macprov.toml");
        if config_path.exists() {
            return Ok(Some(config_path));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        let home_config = home_dir.join(".macprov.toml");
        if home_config.exists() {
            return Ok(Some(home_config));
        }
    }

    Ok(None)
}

/// Load and parse config file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

    Ok(config)
}

/// Load config with automatic discovery, falling back to defaults
pub fn load_config_auto(explicit_path: Option<&Path>) -> Result<(Option<PathBuf>, Config)> {
    match find_config_file(explicit_path)? {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((Some(path), config))
        }
        None => Ok((None, Config::default())),
    }
}

/// Merge file config, environment and CLI overrides into `Settings`.
///
/// Precedence: override > environment > file > default.
pub fn resolve_settings<F>(
    config: Config,
    overrides: Overrides,
    lookup_env: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = overrides
        .api_key
        .or_else(|| API_KEY_ENV_VARS.iter().find_map(|name| lookup_env(name)))
        .or(config.api_key)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey)?;

    Ok(Settings {
        api_key,
        base_url: overrides.base_url.unwrap_or(config.base_url),
        csv_path: overrides.csv_path.unwrap_or(config.csv_path),
        http: config.http,
    })
}

/// `resolve_settings` against the process environment
pub fn resolve_from_env(config: Config, overrides: Overrides) -> Result<Settings, ConfigError> {
    resolve_settings(config, overrides, |name| env::var(name).ok())
}
