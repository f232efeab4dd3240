//! Configuration system for skybot.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults (Herceg Novi, development environment)
//! 2. `skybot.toml` in `$XDG_CONFIG_HOME/skybot/` or the `--config` directory
//! 3. Environment variables, including those loaded from a `.env` file
//!
//! The resulting [`Config`] is loaded once at startup and passed explicitly to
//! everything that needs it; nothing reads the process environment later.
//!
//! ```toml
//! environment = "development"      # "production" silences debug output
//!
//! #[Default location]
//! location_name = "Herceg Novi"
//! latitude = 42.4531               # Geographic latitude (-90 to +90)
//! longitude = 18.5375              # Geographic longitude (-180 to +180)
//! elevation = 10.0                 # Observer elevation in meters (>= 0)
//! timezone = "Europe/Podgorica"    # IANA zone for local times in replies
//!
//! #[Weatherbit]
//! weatherbit_api_key = "..."
//! weatherbit_base_url = "https://api.weatherbit.io/v2.0"
//!
//! #[Telegram]
//! telegram_bot_token = "..."
//! poll_timeout = 30                # Long-poll timeout in seconds (1-60)
//! ```
//!
//! Environment overrides: `ENVIRONMENT`, `WEATHERBIT_API_KEY`,
//! `TELEGRAM_BOT_TOKEN`, `SKYBOT_LATITUDE`, `SKYBOT_LONGITUDE`,
//! `SKYBOT_ELEVATION`, `SKYBOT_TIMEZONE`.

pub mod loading;
pub mod validation;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::astro::GeoPosition;
use crate::constants::*;

pub use loading::{apply_env_overrides, get_config_path, load, load_dotenv};
pub use validation::validate_config;

/// Configuration structure for skybot settings.
///
/// Every field is optional; accessors fall back to the defaults in
/// [`crate::constants`].
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Deployment environment. Anything but "production" enables debug output.
    pub environment: Option<String>,

    /// Display name of the default location used by `/hi`.
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>, // meters
    /// IANA time zone used to show local times for the default location.
    pub timezone: Option<String>,

    pub weatherbit_api_key: Option<String>,
    pub weatherbit_base_url: Option<String>,

    pub telegram_bot_token: Option<String>,
    pub telegram_base_url: Option<String>,
    pub poll_timeout: Option<u64>, // seconds
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some(PRODUCTION_ENVIRONMENT)
    }

    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    pub fn location_name(&self) -> &str {
        self.location_name.as_deref().unwrap_or(DEFAULT_LOCATION_NAME)
    }

    /// The default location as a position for the calculators.
    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(
            self.latitude.unwrap_or(DEFAULT_LATITUDE),
            self.longitude.unwrap_or(DEFAULT_LONGITUDE),
        )
        .with_elevation(self.elevation.unwrap_or(DEFAULT_ELEVATION))
    }

    /// Time zone of the default location.
    ///
    /// Validation guarantees a configured zone parses; UTC is the last resort.
    pub fn timezone(&self) -> Tz {
        self.timezone
            .as_deref()
            .unwrap_or(DEFAULT_TIMEZONE)
            .parse()
            .unwrap_or(Tz::UTC)
    }

    pub fn weatherbit_base_url(&self) -> &str {
        self.weatherbit_base_url
            .as_deref()
            .unwrap_or(DEFAULT_WEATHERBIT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn telegram_base_url(&self) -> &str {
        self.telegram_base_url
            .as_deref()
            .unwrap_or(DEFAULT_TELEGRAM_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn poll_timeout(&self) -> u64 {
        self.poll_timeout.unwrap_or(DEFAULT_POLL_TIMEOUT)
    }

    /// Names of required secrets that are not configured.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.telegram_bot_token.as_deref().is_none_or(str::is_empty) {
            missing.push("TELEGRAM_BOT_TOKEN");
        }
        if self.weatherbit_api_key.as_deref().is_none_or(str::is_empty) {
            missing.push("WEATHERBIT_API_KEY");
        }
        missing
    }

    /// Log the effective configuration. Secrets are never printed.
    pub fn log_config(&self, source: &str) {
        log_block_start!("Loaded configuration from {}", source);
        log_indented!("Environment: {}", self.environment());
        log_indented!("Location: {} ({})", self.location_name(), self.position());
        log_indented!("Elevation: {}m", self.position().elevation);
        log_indented!("Timezone: {}", self.timezone());
        log_indented!("Weatherbit API: {}", self.weatherbit_base_url());
        log_indented!(
            "Weatherbit key: {}",
            secret_status(self.weatherbit_api_key.as_deref())
        );
        log_indented!(
            "Telegram token: {}",
            secret_status(self.telegram_bot_token.as_deref())
        );
        log_indented!("Poll timeout: {}s", self.poll_timeout());
    }
}

fn secret_status(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "set",
        _ => "missing",
    }
}
