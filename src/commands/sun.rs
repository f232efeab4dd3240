//! Implementation of the sun command.
//!
//! Prints the next sunrise and sunset for a position. Times are shown in the
//! zone given by `--tz`, else the zone containing `--lat/--lon`, else the
//! configured zone.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::astro::{self, CircumpolarKind, GeoPosition, SunEventResult};
use crate::constants::DEFAULT_ELEVATION;

/// Handle `skybot sun`.
pub fn handle_sun_command(
    config_dir: Option<&str>,
    location: Option<(f64, f64)>,
    elevation: Option<f64>,
    at: Option<&str>,
    timezone: Option<&str>,
) -> Result<()> {
    let config = super::load_config(config_dir)?;

    let position = match location {
        Some((lat, lon)) => {
            GeoPosition::new(lat, lon).with_elevation(elevation.unwrap_or(DEFAULT_ELEVATION))
        }
        None => {
            let position = config.position();
            position.with_elevation(elevation.unwrap_or(position.elevation))
        }
    };

    let tz = match timezone {
        Some(name) => super::parse_timezone(name)?,
        None if location.is_some() => {
            astro::determine_timezone_from_coordinates(position.latitude, position.longitude)
                .unwrap_or_else(|| config.timezone())
        }
        None => config.timezone(),
    };

    let at = super::resolve_instant(at, tz)?;
    let result = astro::sun_events(&position, at).context("Failed to calculate sun times")?;

    log_version!();
    log_block_start!("Sun events at {} ({}m)", position, position.elevation);
    log_indented!("From: {}", format_local(at, tz));
    log_debug!(
        "Horizon altitude: {:.3}°",
        astro::sun::horizon_altitude_deg(position.elevation)
    );

    match result {
        SunEventResult::Events { sunrise, sunset } => {
            log_indented!("Sunrise: {}", format_local(sunrise, tz));
            log_indented!("Sunset:  {}", format_local(sunset, tz));
        }
        SunEventResult::Circumpolar(kind) => {
            let reason = match kind {
                CircumpolarKind::PolarDay => "the sun stays above the horizon",
                CircumpolarKind::PolarNight => "the sun stays below the horizon",
            };
            log_indented!("No sunrise or sunset: {}", reason);
        }
    }
    log_end!();

    Ok(())
}

fn format_local(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Display help for the sun command.
pub fn display_help() {
    log_version!();
    log_block_start!("sun - Show the next sunrise and sunset");
    log_block_start!(
        "Usage: skybot sun [--lat <deg> --lon <deg>] [--elevation <m>] [--at <time>] [--tz <zone>]"
    );
    log_block_start!("Options:");
    log_indented!("--lat <deg>          Latitude (-90 to 90), requires --lon");
    log_indented!("--lon <deg>          Longitude (-180 to 180), requires --lat");
    log_indented!("-e, --elevation <m>  Observer elevation in meters (default 10)");
    log_indented!("--at <time>          RFC 3339 or \"YYYY-MM-DD HH:MM:SS\"");
    log_indented!("--tz <zone>          IANA zone used to display the times");
    log_block_start!("Examples:");
    log_indented!("skybot sun");
    log_indented!("skybot sun --lat 69.6492 --lon 18.9553 --at \"2024-12-21 12:00:00\"");
    log_end!();
}
