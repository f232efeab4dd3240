//! Configuration validation functionality.

use anyhow::Result;
use chrono_tz::Tz;

use super::Config;
use crate::constants::*;

/// Validate a merged configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(lat.is_finite() && (-90.0..=90.0).contains(&lat))
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(lon.is_finite() && (-180.0..=180.0).contains(&lon))
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(elevation) = config.elevation
        && !(elevation.is_finite() && elevation >= 0.0)
    {
        anyhow::bail!(
            "elevation must be a non-negative number of meters (got {})",
            elevation
        );
    }

    if let Some(tz) = config.timezone.as_deref()
        && tz.parse::<Tz>().is_err()
    {
        anyhow::bail!(
            "timezone '{}' is not a valid IANA time zone (e.g. \"Europe/Podgorica\")",
            tz
        );
    }

    if let Some(timeout) = config.poll_timeout
        && !(MINIMUM_POLL_TIMEOUT..=MAXIMUM_POLL_TIMEOUT).contains(&timeout)
    {
        anyhow::bail!(
            "poll_timeout ({} seconds) must be between {} and {} seconds",
            timeout,
            MINIMUM_POLL_TIMEOUT,
            MAXIMUM_POLL_TIMEOUT
        );
    }

    if let Some(environment) = config.environment.as_deref()
        && environment.trim().is_empty()
    {
        anyhow::bail!("environment cannot be empty");
    }

    for (name, url) in [
        ("weatherbit_base_url", config.weatherbit_base_url.as_deref()),
        ("telegram_base_url", config.telegram_base_url.as_deref()),
    ] {
        if let Some(url) = url
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            anyhow::bail!("{} must be an http(s) URL (got '{}')", name, url);
        }
    }

    Ok(())
}
