//! External lookups: the local vehicle detail file and the weather service.
//!
//! Both are best-effort, single request-response operations; a failure here
//! is reported inline and never disturbs the rest of the garage.

mod details;
mod weather;

pub use details::{DetailsError, VehicleDetails, lookup_details};
pub use weather::{WeatherClient, WeatherError, WeatherReport};
