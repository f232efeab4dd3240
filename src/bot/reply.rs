//! Reply rendering.
//!
//! Every reply is plain text. Failures of the weather API or the astronomical
//! calculators never abort a reply; the affected part is replaced by a
//! placeholder and the cause is logged.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::{Command, title_case};
use crate::astro::{self, GeoPosition, SunEventResult};
use crate::config::Config;
use crate::constants::*;
use crate::time_source::TimeSource;
use crate::weather::{DailyForecast, WeatherProvider, WeatherQuery};

/// Moon glyph shown when the phase cannot be computed.
const UNKNOWN_MOON_EMOJI: &str = "🌙";

/// Renders replies for the default location and for named cities.
pub struct Responder<'a> {
    config: &'a Config,
    weather: &'a dyn WeatherProvider,
    clock: &'a dyn TimeSource,
}

impl<'a> Responder<'a> {
    pub fn new(
        config: &'a Config,
        weather: &'a dyn WeatherProvider,
        clock: &'a dyn TimeSource,
    ) -> Self {
        Self {
            config,
            weather,
            clock,
        }
    }

    /// The reply for `command`, or `None` when the message is not answered.
    pub fn reply(&self, command: &Command) -> Option<String> {
        match command {
            Command::Start => Some(self.welcome()),
            Command::Help => Some(self.help()),
            Command::Hi => Some(self.hi()),
            Command::Forecast(city) => Some(self.forecast(city)),
            Command::Ignored => None,
        }
    }

    pub fn welcome(&self) -> String {
        format!(
            "Hello! 👋\n\n\
             Get weather data for {} using /hi.\n\n\
             Or request another city's forecast by typing a command in this format:\n\
             e.g., /london, /moscow, /tokyo.",
            self.config.location_name()
        )
    }

    pub fn help(&self) -> String {
        format!(
            "/hi - sunrise, sunset, weather and moon phase for {}\n\
             /<city> - forecast with sunrise and sunset for a city, e.g. /london\n\
             /start - welcome message\n\
             /help - this message",
            self.config.location_name()
        )
    }

    /// Report for the configured default location.
    pub fn hi(&self) -> String {
        log_info!("Received /hi command, calculating moon phase and weather...");

        let now = self.clock.now();
        let tz = self.config.timezone();
        let position = self.config.position();

        let moon = moon_line(&position, now);
        let (sunrise, sunset) = sun_lines(&position, now, tz);

        let weather = match self
            .weather
            .daily_forecast(&WeatherQuery::Coordinates(position))
        {
            Ok(forecast) if forecast.is_complete() => weather_block(&forecast),
            Ok(_) => {
                log_warning!("Incomplete weather data for {}", self.config.location_name());
                WEATHER_UNAVAILABLE.to_string()
            }
            Err(e) => {
                log_error!("Weather lookup failed: {}", e);
                WEATHER_UNAVAILABLE.to_string()
            }
        };

        format!(
            "🌍 {}, {}:\n🌅 Sunrise: {}\n{}\n🌇 Sunset: {}\n{}",
            self.config.location_name(),
            now.with_timezone(&tz).format("%A %d/%m"),
            sunrise,
            weather,
            sunset,
            moon
        )
    }

    /// Forecast for a city named in a `/city` command.
    pub fn forecast(&self, city: &str) -> String {
        if city.is_empty() {
            return "Please provide a valid city name.".to_string();
        }

        log_info!("Received forecast request for '{}'", city);
        let display_name = title_case(city);

        let forecast = match self
            .weather
            .daily_forecast(&WeatherQuery::City(city.to_string()))
        {
            Ok(forecast) if forecast.is_complete() => forecast,
            Ok(_) => {
                log_warning!("Incomplete weather data for '{}'", city);
                return unavailable_for(&display_name);
            }
            Err(e) => {
                log_error!("Weather lookup for '{}' failed: {}", city, e);
                return unavailable_for(&display_name);
            }
        };

        let mut message = format!("Forecast for {}:\n{}", display_name, weather_block(&forecast));

        if let Some(position) = forecast.position() {
            let tz = self.city_timezone(&forecast, &position);
            let (sunrise, sunset) = sun_lines(&position, self.clock.now(), tz);
            message.push_str(&format!("\n🌅 Sunrise: {sunrise}\n🌇 Sunset: {sunset}"));
        }

        message
    }

    /// Zone used for a city's local times: the provider's, then a lookup from
    /// the coordinates, then the configured zone.
    fn city_timezone(&self, forecast: &DailyForecast, position: &GeoPosition) -> Tz {
        if let Some(tz) = forecast
            .timezone
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return tz;
        }

        astro::determine_timezone_from_coordinates(position.latitude, position.longitude)
            .unwrap_or_else(|| {
                log_debug!("No time zone found for {}, using configured zone", position);
                self.config.timezone()
            })
    }
}

fn unavailable_for(city: &str) -> String {
    format!("Weather data for {city} is currently unavailable.")
}

fn weather_block(forecast: &DailyForecast) -> String {
    format!(
        "🌡 Weather: {}\n❄️ Min Temp: {:.1}°C\n☀️ Max Temp: {:.1}°C\n🌬 Pressure: {:.0} hPa",
        forecast.description.as_deref().unwrap_or_default(),
        forecast.min_temp.unwrap_or_default(),
        forecast.max_temp.unwrap_or_default(),
        forecast.pressure.unwrap_or_default()
    )
}

fn moon_line(position: &GeoPosition, at: DateTime<Utc>) -> String {
    match astro::phase(position, at) {
        Ok(phase) => {
            log_debug!(
                "Moon phase {:.4} ({}) between new moons {} and {}",
                phase.fraction,
                phase.label,
                phase.previous_new_moon,
                phase.next_new_moon
            );
            format!("{} Moon Phase: {}", phase.label.emoji(), phase.label.name())
        }
        Err(e) => {
            log_error!("Error calculating moon phase: {}", e);
            format!("{UNKNOWN_MOON_EMOJI} Moon Phase: {MOON_PHASE_UNAVAILABLE}")
        }
    }
}

/// Sunrise and sunset as `HH:MM` in `tz`, or their placeholders.
fn sun_lines(position: &GeoPosition, at: DateTime<Utc>, tz: Tz) -> (String, String) {
    match astro::sun_events(position, at) {
        Ok(SunEventResult::Events { sunrise, sunset }) => {
            log_debug!(
                "Sun events for {}: sunrise {}, sunset {}",
                position,
                sunrise,
                sunset
            );
            (
                sunrise.with_timezone(&tz).format("%H:%M").to_string(),
                sunset.with_timezone(&tz).format("%H:%M").to_string(),
            )
        }
        Ok(SunEventResult::Circumpolar(kind)) => {
            log_info!("Sun is circumpolar at {} ({:?})", position, kind);
            (NO_SUNRISE.to_string(), NO_SUNSET.to_string())
        }
        Err(e) => {
            log_error!("Error calculating sun times: {}", e);
            (SUN_EVENT_UNKNOWN.to_string(), SUN_EVENT_UNKNOWN.to_string())
        }
    }
}
