//! Time zone lookup for coordinates.
//!
//! Used to show sunrise and sunset in the local time of a forecast city when
//! the weather API does not say which zone the city is in.

use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

static FINDER: OnceLock<DefaultFinder> = OnceLock::new();

/// Determine the IANA time zone containing the given coordinates.
///
/// Returns `None` for coordinates tzf-rs cannot place (open ocean with an
/// unparseable `Etc/*` name) or for names chrono-tz does not know.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Option<Tz> {
    if !(latitude.is_finite() && longitude.is_finite()) {
        return None;
    }

    // Building the finder decodes the embedded boundary data, so do it once
    let finder = FINDER.get_or_init(DefaultFinder::new);
    let name = finder.get_tz_name(longitude, latitude);
    if name.is_empty() {
        return None;
    }

    name.parse::<Tz>().ok()
}
