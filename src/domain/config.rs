use std::{env, io, path::Path};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured weather API key.
const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Garage configuration, read from `config.toml` under the garage root.
///
/// Every field has a default, so a missing file (or an empty one) yields a
/// working configuration. The weather API key is the one setting that is
/// deliberately external: it is read from the `OPENWEATHER_API_KEY`
/// environment variable first and the config file second, and is never
/// stored in source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weather lookup settings.
    pub weather: Weather,
    /// Detail-file lookup settings.
    pub details: Details,
}

/// Settings for the weather lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    /// API key for the weather service. Prefer the environment variable.
    pub api_key: Option<String>,
    /// Unit system sent to the weather service.
    pub units: String,
    /// Locale for weather descriptions.
    pub lang: String,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            api_key: None,
            units: "metric".to_string(),
            lang: "pt_br".to_string(),
        }
    }
}

/// Settings for the local detail-file lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Details {
    /// Path of the detail file, relative to the garage root.
    pub path: String,
}

impl Default for Details {
    fn default() -> Self {
        Self {
            path: "vehicle_details.json".to_string(),
        }
    }
}

/// Why the configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read the config file")]
    Io(#[from] io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse the config file")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// File name of the configuration under the garage root.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Loads the configuration from `config.toml` under `root`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The weather API key: environment variable first, config file second.
    #[must_use]
    pub fn weather_api_key(&self) -> Option<String> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.weather.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Weather};

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.weather.units, "metric");
        assert_eq!(config.details.path, "vehicle_details.json");
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(Config::FILE_NAME),
            "[weather]\napi_key = \"abc123\"\n",
        )
        .unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.weather.lang, "pt_br");
    }

    #[test]
    fn env_var_overrides_the_configured_key() {
        let config = Config {
            weather: Weather {
                api_key: Some("from-config".to_string()),
                ..Weather::default()
            },
            ..Config::default()
        };

        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::set_var(super::API_KEY_ENV, "from-env") };
        assert_eq!(config.weather_api_key().as_deref(), Some("from-env"));

        // an empty value counts as unset
        unsafe { std::env::set_var(super::API_KEY_ENV, "") };
        assert_eq!(config.weather_api_key().as_deref(), Some("from-config"));

        unsafe { std::env::remove_var(super::API_KEY_ENV) };
        assert_eq!(config.weather_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn garbage_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(Config::FILE_NAME), "not toml [").unwrap();
        assert!(Config::load(tmp.path()).is_err());
    }
}
