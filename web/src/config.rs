use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BOOKING_API_URL: &str = "http://127.0.0.1:8080/api/";
pub const DEFAULT_ARTISTS_FILE: &str = "artists.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOOKING_API_URL is not a valid URL ({value}): {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("BOOKING_API_URL must use http or https, got `{0}`")]
    UnsupportedScheme(String),
}

/// Server settings read from the environment after `.env` has been loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub booking_api_url: String,
    pub artists_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let booking_api_url = lookup("BOOKING_API_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BOOKING_API_URL.to_string());

        let parsed = reqwest::Url::parse(&booking_api_url).map_err(|e| ConfigError::InvalidUrl {
            value: booking_api_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let artists_file = lookup("ARTISTS_FILE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ARTISTS_FILE.to_string());

        Ok(Self {
            booking_api_url,
            artists_file: PathBuf::from(artists_file),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.booking_api_url, DEFAULT_BOOKING_API_URL);
        assert_eq!(config.artists_file, PathBuf::from("artists.json"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            AppConfig::from_lookup(lookup(&[("BOOKING_API_URL", "  "), ("ARTISTS_FILE", "")]))
                .unwrap();
        assert_eq!(config.booking_api_url, DEFAULT_BOOKING_API_URL);
        assert_eq!(config.artists_file, PathBuf::from(DEFAULT_ARTISTS_FILE));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BOOKING_API_URL", "https://bookings.example.com/api/"),
            ("ARTISTS_FILE", "/etc/studio/artists.json"),
        ]))
        .unwrap();
        assert_eq!(config.booking_api_url, "https://bookings.example.com/api/");
        assert_eq!(config.artists_file, PathBuf::from("/etc/studio/artists.json"));
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("BOOKING_API_URL", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("BOOKING_API_URL", "ftp://example.com/")])),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
    }
}
