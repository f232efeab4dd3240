//! Weatherbit daily forecast client.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{DailyForecast, WeatherError, WeatherProvider, WeatherQuery, round_tenth};
use crate::config::Config;
use crate::constants::HTTP_TIMEOUT_SECS;

/// Blocking client for `GET {base}/forecast/daily`.
pub struct WeatherbitClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherbitClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Self::new(
            config.weatherbit_base_url(),
            config.weatherbit_api_key.clone(),
        )
    }

    fn query_params(query: &WeatherQuery, key: &str) -> Vec<(&'static str, String)> {
        let mut params = match query {
            WeatherQuery::City(city) => vec![("city", city.clone())],
            WeatherQuery::Coordinates(position) => vec![
                ("lat", position.latitude.to_string()),
                ("lon", position.longitude.to_string()),
            ],
        };
        params.push(("key", key.to_string()));
        params.push(("days", "1".to_string()));
        params
    }
}

impl WeatherProvider for WeatherbitClient {
    fn daily_forecast(&self, query: &WeatherQuery) -> Result<DailyForecast, WeatherError> {
        let key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let request = self
            .http
            .get(format!("{}/forecast/daily", self.base_url))
            .query(&Self::query_params(query, key))
            .build()?;

        match query {
            WeatherQuery::City(city) => log_debug!(
                "Requesting Weatherbit forecast for city '{}': {}",
                city,
                redact_key(request.url().as_str())
            ),
            WeatherQuery::Coordinates(_) => log_debug!(
                "Requesting Weatherbit forecast: {}",
                redact_key(request.url().as_str())
            ),
        }

        let response = self.http.execute(request)?;
        check_status(response.status())?;

        // Weatherbit answers an unknown city with 204 and an empty body
        if response.status() == StatusCode::NO_CONTENT {
            return Err(WeatherError::MissingData);
        }

        let body = response.text()?;
        let forecast = parse_forecast(&body)?;

        log_debug!(
            "Weather data: Min {:?}°C, Max {:?}°C, Pressure {:?} hPa, {:?}",
            forecast.min_temp,
            forecast.max_temp,
            forecast.pressure,
            forecast.description
        );
        log_debug!(
            "Coordinates: lat={:?}, lon={:?}, timezone={:?}",
            forecast.latitude,
            forecast.longitude,
            forecast.timezone
        );

        Ok(forecast)
    }
}

/// Map a response status to the matching error, if it is not a success.
fn check_status(status: StatusCode) -> Result<(), WeatherError> {
    match status {
        StatusCode::FORBIDDEN => Err(WeatherError::InvalidApiKey),
        StatusCode::TOO_MANY_REQUESTS => Err(WeatherError::RateLimited),
        s if !s.is_success() => Err(WeatherError::Status(s.as_u16())),
        _ => Ok(()),
    }
}

/// Replace the value of the `key` query parameter with `<HIDDEN>`.
pub fn redact_key(url: &str) -> String {
    let Some(start) = url.find("key=").map(|i| i + "key=".len()) else {
        return url.to_string();
    };
    let end = url[start..]
        .find('&')
        .map(|i| start + i)
        .unwrap_or(url.len());
    format!("{}<HIDDEN>{}", &url[..start], &url[end..])
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    data: Option<Vec<ForecastDay>>,
    city_name: Option<String>,
    lat: Option<Coordinate>,
    lon: Option<Coordinate>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    min_temp: Option<f64>,
    max_temp: Option<f64>,
    pres: Option<f64>,
    weather: Option<WeatherDescription>,
}

#[derive(Debug, Deserialize)]
struct WeatherDescription {
    description: Option<String>,
}

/// Weatherbit sends top-level coordinates as strings, per-station ones as
/// numbers. Accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Parse a `forecast/daily` response body into today's forecast.
pub fn parse_forecast(body: &str) -> Result<DailyForecast, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(body)?;

    let today = response
        .data
        .and_then(|days| days.into_iter().next())
        .ok_or(WeatherError::MissingData)?;

    Ok(DailyForecast {
        min_temp: today.min_temp.map(round_tenth),
        max_temp: today.max_temp.map(round_tenth),
        pressure: today.pres.map(f64::round),
        description: today.weather.and_then(|w| w.description),
        latitude: response.lat.as_ref().and_then(Coordinate::value),
        longitude: response.lon.as_ref().and_then(Coordinate::value),
        timezone: response.timezone,
        city_name: response.city_name,
    })
}
