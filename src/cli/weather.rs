use std::path::PathBuf;

use clap::Parser;
use garage::{Config, WeatherClient};
use tracing::instrument;

/// Conversion from the API's m/s wind speed to km/h for display.
const MS_TO_KMH: f64 = 3.6;

#[derive(Debug, Parser)]
#[command(about = "Look up the weather for a trip destination")]
pub struct Weather {
    /// City to look up
    city: String,
}

impl Weather {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        anyhow::ensure!(!self.city.trim().is_empty(), "the city must not be empty");

        let config = Config::load(&root)?;
        let api_key = config.weather_api_key().ok_or_else(|| {
            anyhow::anyhow!(
                "no weather API key configured; set OPENWEATHER_API_KEY or \
                 [weather] api_key in config.toml"
            )
        })?;

        let client = WeatherClient::new(api_key, config.weather.units, config.weather.lang)?;
        let report = client.current(self.city.trim())?;

        println!("Weather in {}, {}", report.city, report.country);
        println!("  Description: {}", capitalize(&report.description));
        println!("  Temperature: {:.1}°C", report.temperature);
        println!("  Feels like:  {:.1}°C", report.feels_like);
        println!(
            "  Min / max:   {:.1}°C / {:.1}°C",
            report.temp_min, report.temp_max
        );
        println!("  Humidity:    {}%", report.humidity);
        println!("  Wind:        {:.1} km/h", report.wind_speed * MS_TO_KMH);
        println!("  Icon:        {}", report.icon);
        Ok(())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
