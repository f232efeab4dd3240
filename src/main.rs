//! Main application entry point.
//!
//! Parses the command line, applies the global logging switches and hands off
//! to the matching handler in `skybot::commands`. Any error a handler returns
//! is logged as the final line and turns into a non-zero exit code.

use anyhow::Result;

use skybot::args::{self, CliAction, ParsedArgs};
use skybot::commands;
use skybot::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use skybot::log_error_exit;
use skybot::logger::Log;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match dispatch(parsed_args.action) {
        Ok(code) => code,
        Err(e) => {
            log_error_exit!("{:#}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}

fn dispatch(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
        }
        CliAction::ShowHelp => {
            args::display_help();
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            return Ok(EXIT_FAILURE);
        }
        CliAction::Help { command } => {
            commands::help::run_help_command(command.as_deref())?;
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            log_file,
        } => {
            Log::set_debug(debug_enabled);
            commands::run::handle_run_command(
                debug_enabled,
                config_dir.as_deref(),
                log_file.as_deref(),
            )?;
        }
        CliAction::Moon {
            debug_enabled,
            config_dir,
            location,
            at,
        } => {
            Log::set_debug(debug_enabled);
            commands::moon::handle_moon_command(config_dir.as_deref(), location, at.as_deref())?;
        }
        CliAction::Sun {
            debug_enabled,
            config_dir,
            location,
            elevation,
            at,
            timezone,
        } => {
            Log::set_debug(debug_enabled);
            commands::sun::handle_sun_command(
                config_dir.as_deref(),
                location,
                elevation,
                at.as_deref(),
                timezone.as_deref(),
            )?;
        }
        CliAction::Hi {
            debug_enabled,
            config_dir,
            at,
        } => {
            Log::set_debug(debug_enabled);
            commands::reply::handle_hi_command(config_dir.as_deref(), at.as_deref())?;
        }
        CliAction::Forecast {
            debug_enabled,
            config_dir,
            city,
        } => {
            Log::set_debug(debug_enabled);
            commands::reply::handle_forecast_command(config_dir.as_deref(), &city)?;
        }
        CliAction::Check {
            debug_enabled,
            config_dir,
        } => {
            Log::set_debug(debug_enabled);
            commands::check::handle_check_command(config_dir.as_deref())?;
        }
    }

    Ok(EXIT_SUCCESS)
}
