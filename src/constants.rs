//! Application-wide constants and defaults.

// # Default location (Herceg Novi, Montenegro)

pub const DEFAULT_LOCATION_NAME: &str = "Herceg Novi";
pub const DEFAULT_LATITUDE: f64 = 42.4531;
pub const DEFAULT_LONGITUDE: f64 = 18.5375;
/// Observer elevation in meters used when none is supplied.
pub const DEFAULT_ELEVATION: f64 = 10.0;
pub const DEFAULT_TIMEZONE: &str = "Europe/Podgorica";

// # Environment

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const PRODUCTION_ENVIRONMENT: &str = "production";

// # Sun events

/// Depression of the apparent horizon below the geometric one, in arcminutes.
/// Applied to the upper limb of the sun.
pub const HORIZON_DEPRESSION_ARCMIN: f64 = 34.0;
/// Mean apparent solar semi-diameter, in arcminutes.
pub const SOLAR_SEMIDIAMETER_ARCMIN: f64 = 16.0;

// # Moon phase

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588861;
/// Width of each of the eight phase buckets.
pub const PHASE_BUCKET_WIDTH: f64 = 0.125;

// # Weather API

pub const DEFAULT_WEATHERBIT_BASE_URL: &str = "https://api.weatherbit.io/v2.0";
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// # Telegram

pub const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT: u64 = 30;
pub const MINIMUM_POLL_TIMEOUT: u64 = 1;
pub const MAXIMUM_POLL_TIMEOUT: u64 = 60;
/// Pause after a failed poll before trying again, in seconds.
pub const POLL_RETRY_DELAY_SECS: u64 = 5;

// # Placeholders rendered in replies

pub const MOON_PHASE_UNAVAILABLE: &str = "Unable to calculate moon phase";
pub const SUN_EVENT_UNKNOWN: &str = "Unknown";
pub const NO_SUNRISE: &str = "No sunrise";
pub const NO_SUNSET: &str = "No sunset";
pub const WEATHER_UNAVAILABLE: &str = "Weather data currently unavailable";
pub const GENERIC_FAILURE_REPLY: &str = "Sorry, something went wrong. Please try again later.";

// # Files

pub const CONFIG_FILE_NAME: &str = "skybot.toml";
pub const CONFIG_DIR_NAME: &str = "skybot";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
