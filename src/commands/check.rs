//! Implementation of the check command.
//!
//! Verifies that the configuration loads, that the secrets the bot needs are
//! present, and that both calculators produce a result for the default
//! location.

use anyhow::Result;
use chrono::Utc;

use crate::astro;
use crate::config::Config;

/// Outcome of a configuration check.
#[derive(Debug, PartialEq)]
pub struct CheckReport {
    pub missing_secrets: Vec<&'static str>,
    pub moon_phase_ok: bool,
    pub sun_events_ok: bool,
}

impl CheckReport {
    pub fn is_ready(&self) -> bool {
        self.missing_secrets.is_empty() && self.moon_phase_ok && self.sun_events_ok
    }
}

/// Run the checks against an already loaded configuration.
pub fn check_config(config: &Config) -> CheckReport {
    let position = config.position();
    let now = Utc::now();

    CheckReport {
        missing_secrets: config.missing_secrets(),
        moon_phase_ok: astro::phase(&position, now).is_ok(),
        sun_events_ok: astro::sun_events(&position, now).is_ok(),
    }
}

/// Handle `skybot check`.
pub fn handle_check_command(config_dir: Option<&str>) -> Result<()> {
    log_version!();

    let config = super::load_config(config_dir)?;
    log_block_start!("✅ Configuration is valid");
    if !crate::logger::Log::is_debug() {
        log_indented!(
            "Location: {} ({}), {}",
            config.location_name(),
            config.position(),
            config.timezone()
        );
    }

    let report = check_config(&config);

    if report.missing_secrets.is_empty() {
        log_block_start!("✅ All required secrets are set");
    } else {
        log_pipe!();
        log_warning!(
            "⚠️ Missing secrets: {}",
            report.missing_secrets.join(", ")
        );
        log_indented!("The bot will not function correctly without them");
        log_indented!("Set them in the environment, a .env file or skybot.toml");
    }

    if report.moon_phase_ok {
        log_block_start!("✅ Moon phase calculator works");
    } else {
        log_pipe!();
        log_error!("❌ Moon phase calculation failed for the default location");
    }

    if report.sun_events_ok {
        log_block_start!("✅ Sun event calculator works");
    } else {
        log_pipe!();
        log_error!("❌ Sun event calculation failed for the default location");
    }

    log_end!();

    if !report.is_ready() {
        anyhow::bail!("configuration check found problems");
    }
    Ok(())
}

/// Display help for the check command.
pub fn display_help() {
    log_version!();
    log_block_start!("check - Verify configuration and required secrets");
    log_block_start!("Usage: skybot check");
    log_block_start!("Checks:");
    log_indented!("skybot.toml and environment overrides load and validate");
    log_indented!("TELEGRAM_BOT_TOKEN and WEATHERBIT_API_KEY are set");
    log_indented!("Moon phase and sun events compute for the default location");
    log_end!();
}
