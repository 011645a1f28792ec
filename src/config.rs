use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, ITEMS_PER_PAGE_OPTIONS};
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub api_url: Option<String>,
    pub api_timeout: Duration,
    pub api_retries: u32,
    pub items_per_page: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            api_url: None,
            api_timeout: Duration::from_millis(10_000),
            api_retries: 3,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| {
            let raw = lookup(key)?;
            match raw.trim().parse::<u64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("ignoring {key}={raw:?}: not a number");
                    None
                }
            }
        };

        let items_per_page = parsed("DASHBOARD_ITEMS_PER_PAGE")
            .map(|value| value as usize)
            .filter(|value| ITEMS_PER_PAGE_OPTIONS.contains(value))
            .unwrap_or(defaults.items_per_page);

        Self {
            port: parsed("PORT")
                .and_then(|value| u16::try_from(value).ok())
                .unwrap_or(defaults.port),
            data_path: lookup("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            api_url: lookup("DASHBOARD_API_URL").filter(|url| !url.trim().is_empty()),
            api_timeout: parsed("DASHBOARD_API_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.api_timeout),
            api_retries: parsed("DASHBOARD_API_RETRIES")
                .and_then(|value| u32::try_from(value).ok())
                .unwrap_or(defaults.api_retries),
            items_per_page,
        }
    }
}
