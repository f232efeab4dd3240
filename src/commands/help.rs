//! Help command implementation for skybot.
//!
//! This module provides a dispatcher for the help command that shows
//! command-specific help or general help based on the arguments provided.

use anyhow::Result;

use crate::args::canonical_command;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    let Some(name) = command else {
        display_general_help();
        return Ok(());
    };

    match canonical_command(name) {
        Some("moon") => super::moon::display_help(),
        Some("sun") => super::sun::display_help(),
        Some("hi") => super::reply::display_hi_help(),
        Some("forecast") => super::reply::display_forecast_help(),
        Some("run") => super::run::display_help(),
        Some("check") => super::check::display_help(),
        Some("help") => display_help_help(),
        _ => {
            log_warning!("Unknown command: {}", name);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("moon, m                 Moon phase for a location and time");
    log_indented!("sun, s                  Next sunrise and sunset for a location");
    log_indented!("hi                      Render the /hi reply");
    log_indented!("forecast, f <city>      Render the /<city> reply");
    log_indented!("run, r                  Start the Telegram bot");
    log_indented!("check, c                Verify configuration and secrets");
    log_indented!("help, h [COMMAND]       Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'skybot help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'skybot --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: skybot help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("skybot help");
    log_indented!("skybot help sun");
    log_end!();
}
