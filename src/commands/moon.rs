//! Implementation of the moon command.
//!
//! Prints the phase of the moon for a position and instant, defaulting to the
//! configured location and the current time.

use anyhow::{Context, Result};

use crate::astro::{self, GeoPosition};

/// Handle `skybot moon`.
pub fn handle_moon_command(
    config_dir: Option<&str>,
    location: Option<(f64, f64)>,
    at: Option<&str>,
) -> Result<()> {
    let config = super::load_config(config_dir)?;
    let tz = config.timezone();

    let position = location
        .map(|(lat, lon)| GeoPosition::new(lat, lon))
        .unwrap_or_else(|| config.position());
    let at = super::resolve_instant(at, tz)?;

    let phase = astro::phase(&position, at).context("Failed to calculate moon phase")?;

    log_version!();
    log_block_start!("Moon phase at {}", position);
    log_indented!("Time: {}", at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z"));
    log_indented!("Phase: {} {}", phase.label.emoji(), phase.label.name());
    log_indented!("Cycle: {:.4}", phase.fraction);
    log_indented!("Illumination: {:.0}%", phase.illumination() * 100.0);
    log_indented!("Age: {:.1} days", phase.age_days(at));
    log_block_start!("New moons:");
    log_indented!(
        "Previous: {}",
        phase
            .previous_new_moon
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M %Z")
    );
    log_indented!(
        "Next:     {}",
        phase
            .next_new_moon
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M %Z")
    );
    log_debug!("Lunation number {}", phase.lunation);
    log_end!();

    Ok(())
}

/// Display help for the moon command.
pub fn display_help() {
    log_version!();
    log_block_start!("moon - Show the moon phase");
    log_block_start!("Usage: skybot moon [--lat <deg> --lon <deg>] [--at <time>]");
    log_block_start!("Options:");
    log_indented!("--lat <deg>   Latitude (-90 to 90), requires --lon");
    log_indented!("--lon <deg>   Longitude (-180 to 180), requires --lat");
    log_indented!("--at <time>   RFC 3339 or \"YYYY-MM-DD HH:MM:SS\" in the configured zone");
    log_block_start!("Examples:");
    log_indented!("skybot moon");
    log_indented!("skybot moon --at \"2024-01-11 12:57:00\"");
    log_end!();
}
