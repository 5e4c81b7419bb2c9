pub mod check;
pub mod list;
pub mod provision;

use crate::config::{load_config_auto, resolve_from_env, validate_settings, Config, Overrides, Settings};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl GlobalOptions {
    fn load(&self) -> Result<Config> {
        let (path, config) = load_config_auto(self.config.as_deref())?;
        match path {
            Some(path) => log::info!("Loaded config from: {}", path.display()),
            None => log::debug!("No config file found, using defaults"),
        }
        Ok(config)
    }

    /// Config + environment + flags, validated
    pub fn settings(&self, csv: Option<&Path>) -> Result<Settings> {
        let overrides = Overrides {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            csv_path: csv.map(Path::to_path_buf),
        };

        let settings = resolve_from_env(self.load()?, overrides)?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// CSV location only; needs no API key
    pub fn csv_path(&self, csv: Option<&Path>) -> Result<PathBuf> {
        match csv {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(self.load()?.csv_path),
        }
    }
}
