//! Implementation of the run command: the Telegram bot itself.

use anyhow::{Context, Result};

use crate::bot::Responder;
use crate::bot::telegram::{TelegramClient, run_polling};
use crate::logger::Log;
use crate::signals::setup_signal_handler;
use crate::time_source::RealTimeSource;
use crate::weather::WeatherbitClient;

/// Handle `skybot run` (and `skybot` without a command).
///
/// Blocks until SIGINT, SIGTERM or SIGHUP.
pub fn handle_run_command(
    debug_enabled: bool,
    config_dir: Option<&str>,
    log_file: Option<&str>,
) -> Result<()> {
    let _log_guard = log_file
        .map(|path| Log::start_file_logging(path.to_string()))
        .transpose()?;

    log_version!();

    let config = super::load_config(config_dir)?;

    // Outside production the bot logs every request in detail
    if !config.is_production() {
        Log::set_debug(true);
    }
    Log::set_timestamps(true);

    if config.telegram_bot_token.as_deref().is_none_or(str::is_empty) {
        log_critical!("No token found! Set TELEGRAM_BOT_TOKEN in the environment or config.");
        anyhow::bail!("TELEGRAM_BOT_TOKEN is required to run the bot");
    }
    if config.weatherbit_api_key.is_none() {
        log_warning!("WEATHERBIT_API_KEY is not set, weather will be unavailable");
    }

    let signal_state = setup_signal_handler(debug_enabled)?;

    let telegram = TelegramClient::from_config(&config).context("Failed to create Telegram client")?;
    let weather =
        WeatherbitClient::from_config(&config).context("Failed to create weather client")?;
    let clock = RealTimeSource;
    let responder = Responder::new(&config, &weather, &clock);

    log_block_start!("Starting bot for {}...", config.location_name());
    log_indented!("Environment: {}", config.environment());
    log_indented!("Long-poll timeout: {}s", config.poll_timeout());

    run_polling(
        &telegram,
        &responder,
        config.poll_timeout(),
        &signal_state.running,
    );

    log_end!();
    Ok(())
}

/// Display help for the run command.
pub fn display_help() {
    log_version!();
    log_block_start!("run - Start the Telegram bot");
    log_block_start!("Usage: skybot run [--log <file>]");
    log_block_start!("Options:");
    log_indented!("-l, --log <file>  Write timestamped output to <file> instead of stdout");
    log_block_start!("Environment:");
    log_indented!("TELEGRAM_BOT_TOKEN   Bot token (required)");
    log_indented!("WEATHERBIT_API_KEY   Weatherbit key (weather shown as unavailable without it)");
    log_indented!("ENVIRONMENT          \"production\" turns off request logging");
    log_pipe!();
    log_info!("Stop with Ctrl+C; a second Ctrl+C exits without waiting for the poll.");
    log_end!();
}
