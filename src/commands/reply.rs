//! Implementation of the hi and forecast commands.
//!
//! Both render exactly the text the bot would send for `/hi` and `/<city>`,
//! using the live weather API.

use anyhow::{Context, Result};

use crate::bot::Responder;
use crate::config::Config;
use crate::time_source::{FixedTimeSource, RealTimeSource, TimeSource};
use crate::weather::WeatherbitClient;

/// Handle `skybot hi`.
pub fn handle_hi_command(config_dir: Option<&str>, at: Option<&str>) -> Result<()> {
    let config = super::load_config(config_dir)?;

    let clock: Box<dyn TimeSource> = match at {
        Some(_) => Box::new(FixedTimeSource(super::resolve_instant(
            at,
            config.timezone(),
        )?)),
        None => Box::new(RealTimeSource),
    };

    render(&config, clock.as_ref(), |responder| responder.hi())
}

/// Handle `skybot forecast <city>`.
pub fn handle_forecast_command(config_dir: Option<&str>, city: &str) -> Result<()> {
    let config = super::load_config(config_dir)?;
    render(&config, &RealTimeSource, |responder| responder.forecast(city))
}

fn render<F>(config: &Config, clock: &dyn TimeSource, build: F) -> Result<()>
where
    F: FnOnce(&Responder) -> String,
{
    if config.weatherbit_api_key.is_none() {
        log_warning!("WEATHERBIT_API_KEY is not set, weather will be unavailable");
    }

    let weather =
        WeatherbitClient::from_config(config).context("Failed to create weather client")?;
    let responder = Responder::new(config, &weather, clock);
    let text = build(&responder);

    log_version!();
    log_block_start!("Reply:");
    for line in text.lines() {
        log_indented!("{}", line);
    }
    log_end!();

    Ok(())
}

/// Display help for the hi command.
pub fn display_hi_help() {
    log_version!();
    log_block_start!("hi - Render the /hi reply for the default location");
    log_block_start!("Usage: skybot hi [--at <time>]");
    log_block_start!("Options:");
    log_indented!("--at <time>  Render the reply as of this instant");
    log_block_start!("Requires WEATHERBIT_API_KEY for the weather section.");
    log_end!();
}

/// Display help for the forecast command.
pub fn display_forecast_help() {
    log_version!();
    log_block_start!("forecast - Render the /<city> reply");
    log_block_start!("Usage: skybot forecast <city>");
    log_block_start!("Examples:");
    log_indented!("skybot forecast london");
    log_indented!("skybot forecast \"new york\"");
    log_end!();
}
