//! Daily weather forecasts.
//!
//! The bot only needs one day of forecast per request: the temperature range,
//! pressure and a short description, plus the coordinates the provider
//! resolved a city name to (used to compute that city's sun events).
//!
//! [`WeatherProvider`] is the seam between the reply renderer and the network;
//! [`WeatherbitClient`] implements it against the Weatherbit REST API.

mod weatherbit;

pub use weatherbit::{WeatherbitClient, parse_forecast, redact_key};

use thiserror::Error;

use crate::astro::GeoPosition;

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// A free-form city name such as "london".
    City(String),
    Coordinates(GeoPosition),
}

/// One day of forecast.
///
/// Every field is optional because the provider may omit any of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyForecast {
    /// Degrees Celsius, rounded to 0.1.
    pub min_temp: Option<f64>,
    /// Degrees Celsius, rounded to 0.1.
    pub max_temp: Option<f64>,
    /// Hectopascals, rounded to a whole number.
    pub pressure: Option<f64>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA zone name reported by the provider.
    pub timezone: Option<String>,
    pub city_name: Option<String>,
}

impl DailyForecast {
    /// True when every value shown in a weather block is present.
    pub fn is_complete(&self) -> bool {
        self.min_temp.is_some()
            && self.max_temp.is_some()
            && self.pressure.is_some()
            && self.description.is_some()
    }

    /// The resolved location of the forecast, if the provider returned one.
    pub fn position(&self) -> Option<GeoPosition> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPosition::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weatherbit API key not configured")]
    MissingApiKey,

    #[error("invalid or expired API key")]
    InvalidApiKey,

    #[error("too many requests, API rate limit exceeded")]
    RateLimited,

    #[error("weather API returned HTTP {0}")]
    Status(u16),

    #[error("HTTP error fetching weather data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("error processing weather data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing weather data in API response")]
    MissingData,
}

/// Source of daily forecasts.
#[cfg_attr(test, mockall::automock)]
pub trait WeatherProvider {
    fn daily_forecast(&self, query: &WeatherQuery) -> Result<DailyForecast, WeatherError>;
}

/// Round to one decimal place.
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
