pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "API key is required; set `api_key` in macprov.toml, export MERAKI_DASHBOARD_API_KEY, or pass --api-key"
    )]
    MissingApiKey,
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("`{0}` must be greater than zero")]
    InvalidTimeout(&'static str),
    #[error("no CSV path configured; set `csv_path` or pass --csv")]
    MissingCsvPath,
}
