use super::{ConfigError, Settings};
use url::Url;

/// Validate resolved settings for correctness
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    validate_base_url(&settings.base_url)?;

    if settings.http.timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout("timeout_secs"));
    }
    if settings.http.connect_timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout("connect_timeout_secs"));
    }

    if settings.csv_path.as_os_str().is_empty() {
        return Err(ConfigError::MissingCsvPath);
    }

    Ok(())
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{}`", other),
        }),
    }
}
