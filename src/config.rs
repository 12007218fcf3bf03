use crate::error::{PriceError, Result};
use crate::models::entry::Role;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from `PRICE_DESK_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub role: Role,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            role: Role::Serviceman,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("PRICE_DESK_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(PriceError::Config(format!(
                    "PRICE_DESK_API_URL must be an http(s) URL, got {url:?}"
                )));
            }
            config.api_url = url;
        }

        config.token = lookup("PRICE_DESK_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(role) = lookup("PRICE_DESK_ROLE") {
            config.role = role.parse()?;
        }

        if let Some(secs) = lookup("PRICE_DESK_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PriceError::Config(format!("PRICE_DESK_TIMEOUT_SECS is not a number: {secs:?}"))
            })?;
            config.timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }
}
