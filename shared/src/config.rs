//! Runtime configuration handed to the core by the shell at start-up.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use url::Url;

use crate::{AppError, ErrorKind};

pub const DEFAULT_TABLE: &str = "aid_requests";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_REALTIME_CHANNEL: &str = "realtime requests";
pub const DEFAULT_REVERSE_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://<project>.supabase.co`.
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeocoderConfig {
    pub reverse_url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            reverse_url: DEFAULT_REVERSE_GEOCODE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default = "default_channel")]
    pub realtime_channel: String,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_channel() -> String {
    DEFAULT_REALTIME_CHANNEL.to_string()
}

/// Absolute `http(s)` URL with a host and no embedded credentials.
fn check_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err("credentials in URL are not allowed".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("store url is invalid: {0}")]
    StoreUrl(String),
    #[error("geocoder url is invalid: {0}")]
    GeocoderUrl(String),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

impl Config {
    /// Config with library defaults for everything but the store endpoint.
    pub fn new(store_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            store: StoreConfig {
                url: store_url.into(),
                anon_key: anon_key.into(),
                schema: default_schema(),
                table: default_table(),
            },
            realtime_channel: default_channel(),
            geocoder: GeocoderConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url(&self.store.url).map_err(ConfigError::StoreUrl)?;
        check_url(&self.geocoder.reverse_url).map_err(ConfigError::GeocoderUrl)?;

        if self.store.anon_key.trim().is_empty() {
            return Err(ConfigError::Empty("store.anon_key"));
        }
        if self.store.table.trim().is_empty() {
            return Err(ConfigError::Empty("store.table"));
        }
        if self.realtime_channel.trim().is_empty() {
            return Err(ConfigError::Empty("realtime_channel"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: Config = serde_json::from_str(
            r#"{"store": {"url": "https://demo.supabase.co", "anon_key": "anon"}}"#,
        )
        .unwrap();
        assert_eq!(config, Config::new("https://demo.supabase.co", "anon"));
        assert_eq!(config.store.table, "aid_requests");
        assert_eq!(config.realtime_channel, "realtime requests");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_keys() {
        let config = Config::new("not a url", "anon");
        assert!(matches!(config.validate(), Err(ConfigError::StoreUrl(_))));

        let config = Config::new("https://demo.supabase.co", "  ");
        assert_eq!(config.validate(), Err(ConfigError::Empty("store.anon_key")));

        let mut config = Config::new("https://demo.supabase.co", "anon");
        config.geocoder.reverse_url = "ftp://geo.example".into();
        assert!(matches!(config.validate(), Err(ConfigError::GeocoderUrl(_))));

        let config = Config::new("https://user:pw@demo.supabase.co", "anon");
        assert!(matches!(config.validate(), Err(ConfigError::StoreUrl(_))));
    }
}
