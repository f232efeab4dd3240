//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Global flags (`--debug`,
//! `--config`, `--help`, `--version`) may appear anywhere; everything after the
//! first non-flag argument belongs to that subcommand.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Start the Telegram bot (also the default with no command)
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        log_file: Option<String>,
    },
    /// Print the moon phase
    Moon {
        debug_enabled: bool,
        config_dir: Option<String>,
        location: Option<(f64, f64)>,
        at: Option<String>,
    },
    /// Print the next sunrise and sunset
    Sun {
        debug_enabled: bool,
        config_dir: Option<String>,
        location: Option<(f64, f64)>,
        elevation: Option<f64>,
        at: Option<String>,
        timezone: Option<String>,
    },
    /// Render the `/hi` reply
    Hi {
        debug_enabled: bool,
        config_dir: Option<String>,
        at: Option<String>,
    },
    /// Render the `/<city>` reply
    Forecast {
        debug_enabled: bool,
        config_dir: Option<String>,
        city: String,
    },
    /// Verify configuration and secrets
    Check {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Detailed help for a command, or the command list
    Help { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Options a subcommand accepts on top of the global ones.
#[derive(Default)]
struct CommandOptions {
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation: Option<f64>,
    at: Option<String>,
    timezone: Option<String>,
    log_file: Option<String>,
    positional: Vec<String>,
}

impl CommandOptions {
    fn location(&self) -> Result<Option<(f64, f64)>, String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(Some((lat, lon))),
            (None, None) => Ok(None),
            _ => Err("--lat and --lon must be given together".to_string()),
        }
    }
}

fn is_help_flag(arg: &str) -> bool {
    matches!(arg, "--help" | "-h")
}

fn is_version_flag(arg: &str) -> bool {
    matches!(arg, "--version" | "-V" | "-v")
}

/// Canonical name of a command or its alias.
pub fn canonical_command(name: &str) -> Option<&'static str> {
    match name {
        "moon" | "m" => Some("moon"),
        "sun" | "s" => Some("sun"),
        "hi" => Some("hi"),
        "forecast" | "f" => Some("forecast"),
        "run" | "r" => Some("run"),
        "check" | "c" => Some("check"),
        "help" | "h" => Some("help"),
        _ => None,
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        ParsedArgs {
            action: Self::parse_action(&args_vec),
        }
    }

    fn parse_action(args_vec: &[String]) -> CliAction {
        let debug_enabled = args_vec.iter().any(|arg| arg == "--debug" || arg == "-d");

        // Find the command, skipping global flags and the --config value
        let mut config_dir: Option<String> = None;
        let mut command_idx = None;
        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = args_vec[idx].as_str();
            match arg {
                "--config" | "-c" => {
                    match args_vec.get(idx + 1).filter(|v| !v.starts_with('-')) {
                        Some(dir) => config_dir = Some(dir.clone()),
                        None => {
                            log_warning!(
                                "Missing directory for --config. Usage: --config <directory>"
                            );
                            return CliAction::ShowHelpDueToError;
                        }
                    }
                    idx += 2;
                }
                "--debug" | "-d" => idx += 1,
                _ if is_help_flag(arg) || is_version_flag(arg) => idx += 1,
                _ if arg.starts_with('-') => {
                    log_warning!("Unknown option: {}", arg);
                    return CliAction::ShowHelpDueToError;
                }
                _ => {
                    command_idx = Some(idx);
                    break;
                }
            }
        }

        let global_flags = &args_vec[..command_idx.unwrap_or(args_vec.len())];
        if global_flags.iter().any(|a| is_version_flag(a)) {
            return CliAction::ShowVersion;
        }
        if global_flags.iter().any(|a| is_help_flag(a)) {
            return CliAction::ShowHelp;
        }

        let Some(command_idx) = command_idx else {
            return CliAction::Run {
                debug_enabled,
                config_dir,
                log_file: None,
            };
        };

        let name = args_vec[command_idx].as_str();
        let Some(command) = canonical_command(name) else {
            log_warning!("Unknown command: {}", name);
            return CliAction::ShowHelpDueToError;
        };

        let rest = &args_vec[command_idx + 1..];

        // `<command> --help` shows that command's help
        if command != "help" && rest.iter().any(|a| is_help_flag(a)) {
            return CliAction::Help {
                command: Some(command.to_string()),
            };
        }

        let options = match parse_command_options(command, rest, &mut config_dir) {
            Ok(options) => options,
            Err(message) => {
                log_warning!("{}", message);
                return CliAction::ShowHelpDueToError;
            }
        };

        match build_action(command, options, debug_enabled, config_dir) {
            Ok(action) => action,
            Err(message) => {
                log_warning!("{}", message);
                CliAction::ShowHelpDueToError
            }
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Which options each command accepts.
fn accepts(command: &str, option: &str) -> bool {
    match command {
        "moon" => matches!(option, "--lat" | "--lon" | "--at"),
        "sun" => matches!(
            option,
            "--lat" | "--lon" | "--elevation" | "-e" | "--at" | "--tz"
        ),
        "hi" => option == "--at",
        "run" => matches!(option, "--log" | "-l"),
        _ => false,
    }
}

fn parse_command_options(
    command: &str,
    rest: &[String],
    config_dir: &mut Option<String>,
) -> Result<CommandOptions, String> {
    let mut options = CommandOptions::default();
    let mut i = 0;

    while i < rest.len() {
        let arg = rest[i].as_str();

        match arg {
            "--debug" | "-d" => {
                i += 1;
                continue;
            }
            "--config" | "-c" => {
                let dir = rest
                    .get(i + 1)
                    .ok_or("Missing directory for --config. Usage: --config <directory>")?;
                *config_dir = Some(dir.clone());
                i += 2;
                continue;
            }
            _ => {}
        }

        if !arg.starts_with('-') || arg.parse::<f64>().is_ok() {
            options.positional.push(arg.to_string());
            i += 1;
            continue;
        }

        if !accepts(command, arg) {
            return Err(format!("Unknown option for '{command}': {arg}"));
        }

        let value = rest
            .get(i + 1)
            .ok_or_else(|| format!("Missing value for {arg}"))?
            .clone();

        match arg {
            "--lat" => options.latitude = Some(parse_number(arg, &value)?),
            "--lon" => options.longitude = Some(parse_number(arg, &value)?),
            "--elevation" | "-e" => options.elevation = Some(parse_number(arg, &value)?),
            "--at" => options.at = Some(value),
            "--tz" => options.timezone = Some(value),
            "--log" | "-l" => options.log_file = Some(value),
            _ => return Err(format!("Unknown option for '{command}': {arg}")),
        }
        i += 2;
    }

    Ok(options)
}

fn parse_number(option: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for {option}: {value}"))
}

fn build_action(
    command: &str,
    options: CommandOptions,
    debug_enabled: bool,
    config_dir: Option<String>,
) -> Result<CliAction, String> {
    let no_positional = |options: &CommandOptions| match options.positional.first() {
        Some(extra) => Err(format!("Unexpected argument for '{command}': {extra}")),
        None => Ok(()),
    };

    let action = match command {
        "moon" => {
            no_positional(&options)?;
            CliAction::Moon {
                debug_enabled,
                config_dir,
                location: options.location()?,
                at: options.at,
            }
        }
        "sun" => {
            no_positional(&options)?;
            CliAction::Sun {
                debug_enabled,
                config_dir,
                location: options.location()?,
                elevation: options.elevation,
                at: options.at,
                timezone: options.timezone,
            }
        }
        "hi" => {
            no_positional(&options)?;
            CliAction::Hi {
                debug_enabled,
                config_dir,
                at: options.at,
            }
        }
        "forecast" => {
            if options.positional.is_empty() {
                return Err("Missing city. Usage: skybot forecast <city>".to_string());
            }
            CliAction::Forecast {
                debug_enabled,
                config_dir,
                city: options.positional.join(" "),
            }
        }
        "run" => {
            no_positional(&options)?;
            CliAction::Run {
                debug_enabled,
                config_dir,
                log_file: options.log_file,
            }
        }
        "check" => {
            no_positional(&options)?;
            CliAction::Check {
                debug_enabled,
                config_dir,
            }
        }
        _ => CliAction::Help {
            command: options.positional.first().cloned(),
        },
    };

    Ok(action)
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("skybot [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("moon, m                Moon phase for a location and time");
    log_indented!("sun, s                 Next sunrise and sunset for a location");
    log_indented!("hi                     Render the /hi reply for the default location");
    log_indented!("forecast, f <city>     Render the /<city> forecast reply");
    log_indented!("run, r                 Start the Telegram bot (default)");
    log_indented!("check, c               Verify configuration and required secrets");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_end!();
}
