use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

/// The weather service endpoint.
const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// How long to wait for the weather service before giving up.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current conditions for a city, projected from the weather service
/// response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Resolved city name.
    pub city: String,
    /// Two-letter country code.
    pub country: String,
    /// Temperature, in the configured units.
    pub temperature: f64,
    /// Perceived temperature.
    pub feels_like: f64,
    /// Minimum temperature right now.
    pub temp_min: f64,
    /// Maximum temperature right now.
    pub temp_max: f64,
    /// Short description in the configured locale.
    pub description: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Wind speed, m/s.
    pub wind_speed: f64,
    /// Icon code of the current conditions.
    pub icon: String,
}

/// Why the weather lookup failed.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The request never completed (connection, TLS, timeout, decode).
    #[error("the weather request failed")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("the weather service returned {status}: {message}")]
    Remote {
        /// HTTP status code of the response.
        status: u16,
        /// Error message reported by the service, or the status line.
        message: String,
    },

    /// The response carried no conditions entry to project.
    #[error("the weather response carried no conditions")]
    EmptyConditions,
}

/// A client for the current-weather endpoint.
///
/// One blocking request per lookup, no retries, surfaced errors; the rest of
/// the garage never depends on it.
#[derive(Debug)]
pub struct WeatherClient {
    api_key: String,
    units: String,
    lang: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    name: String,
    sys: ApiSys,
    main: ApiMain,
    weather: Vec<ApiConditions>,
    wind: ApiWind,
}

#[derive(Debug, Deserialize)]
struct ApiSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ApiConditions {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl WeatherClient {
    /// Creates a client with the given credential and query settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        units: impl Into<String>,
        lang: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            units: units.into(),
            lang: lang.into(),
            client,
        })
    }

    /// Fetches the current conditions for `city`.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success responses (with the remote message
    /// surfaced), and responses without a conditions entry are all errors.
    pub fn current(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        debug!(city, "requesting current weather");
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("q", city),
                ("appid", &self.api_key),
                ("units", &self.units),
                ("lang", &self.lang),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.to_string());
            return Err(WeatherError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiResponse = response.json()?;
        project(body)
    }
}

/// Projects the raw response into the fixed display record.
fn project(body: ApiResponse) -> Result<WeatherReport, WeatherError> {
    let conditions = body
        .weather
        .into_iter()
        .next()
        .ok_or(WeatherError::EmptyConditions)?;
    Ok(WeatherReport {
        city: body.name,
        country: body.sys.country.unwrap_or_default(),
        temperature: body.main.temp,
        feels_like: body.main.feels_like,
        temp_min: body.main.temp_min,
        temp_max: body.main.temp_max,
        description: conditions.description,
        humidity: body.main.humidity,
        wind_speed: body.wind.speed,
        icon: conditions.icon,
    })
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, WeatherError, project};

    const SAMPLE: &str = r#"{
        "name": "Curitiba",
        "sys": { "country": "BR" },
        "main": {
            "temp": 18.3,
            "feels_like": 17.9,
            "temp_min": 16.0,
            "temp_max": 21.2,
            "humidity": 72
        },
        "weather": [
            { "description": "nublado", "icon": "04d" }
        ],
        "wind": { "speed": 3.6 }
    }"#;

    #[test]
    fn projects_the_fixed_display_record() {
        let body: ApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let report = project(body).unwrap();

        assert_eq!(report.city, "Curitiba");
        assert_eq!(report.country, "BR");
        assert_eq!(report.temperature, 18.3);
        assert_eq!(report.description, "nublado");
        assert_eq!(report.humidity, 72);
        assert_eq!(report.icon, "04d");
    }

    #[test]
    fn empty_conditions_are_an_error() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["weather"] = serde_json::json!([]);
        let body: ApiResponse = serde_json::from_value(value).unwrap();
        assert!(matches!(project(body), Err(WeatherError::EmptyConditions)));
    }
}
