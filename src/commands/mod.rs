//! Command-line command handlers for skybot.
//!
//! Each command lives in its own submodule with a `handle_*_command` entry
//! point and a `display_help` function used by `skybot help <command>`.

pub mod check;
pub mod help;
pub mod moon;
pub mod reply;
pub mod run;
pub mod sun;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::Path;

use crate::config::{self, Config};
use crate::time_source::parse_instant;

/// Load `.env`, then the configuration, logging where it came from in debug
/// mode.
pub(crate) fn load_config(config_dir: Option<&str>) -> Result<Config> {
    config::load_dotenv();
    let (config, source) = config::load(config_dir.map(Path::new))?;

    if crate::logger::Log::is_debug() {
        config.log_config(&source);
    }

    Ok(config)
}

/// The instant named by `--at`, or now.
pub(crate) fn resolve_instant(at: Option<&str>, tz: Tz) -> Result<DateTime<Utc>> {
    match at {
        Some(text) => parse_instant(text, tz)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid --at value '{text}'")),
        None => Ok(Utc::now()),
    }
}

/// Parse a `--tz` value.
pub(crate) fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| {
        anyhow::anyhow!("'{name}' is not a valid IANA time zone (e.g. \"Europe/Podgorica\")")
    })
}
