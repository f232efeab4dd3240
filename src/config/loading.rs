//! Configuration loading functionality.
//!
//! Handles locating `skybot.toml`, parsing it, layering environment variables
//! on top and validating the merged result.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use super::validation::validate_config;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Get the configuration file path.
///
/// A custom directory (from `--config`) takes precedence over the XDG config
/// directory.
pub fn get_config_path(config_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = config_dir {
        return Ok(dir.join(CONFIG_FILE_NAME));
    }
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load `.env` from the working directory into the process environment.
///
/// Called once by the binary before [`load`]; a missing file is not an error.
/// Test builds never read `.env` so a developer's secrets cannot leak into
/// test results.
pub fn load_dotenv() {
    if cfg!(feature = "testing-support") {
        return;
    }

    match dotenvy::dotenv() {
        Ok(path) => log_debug!("Loaded environment from {}", private_path(&path)),
        Err(e) if e.not_found() => {}
        Err(e) => log_warning!("Ignoring unreadable .env file: {}", e),
    }
}

/// Load configuration: file (if any), then environment, then validation.
///
/// Returns the configuration and a description of where it came from.
pub fn load(config_dir: Option<&Path>) -> Result<(Config, String)> {
    let path = get_config_path(config_dir)?;

    let (mut config, source) = if path.exists() {
        (parse_file(&path)?, private_path(&path))
    } else if config_dir.is_some() {
        anyhow::bail!(
            "Configuration file not found at specified path: {}",
            private_path(&path)
        );
    } else {
        (Config::default(), "defaults".to_string())
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config)?;

    Ok((config, source))
}

/// Load and validate configuration from a specific file, without the
/// environment layer.
#[cfg(test)]
pub(crate) fn load_from_path(path: &Path) -> Result<Config> {
    let config = parse_file(path)?;
    validate_config(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))
}

/// Overlay environment variables on `config`.
///
/// `lookup` abstracts the environment so callers (and tests) decide where the
/// values come from. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(environment) = get("ENVIRONMENT") {
        config.environment = Some(environment.trim().to_lowercase());
    }
    if let Some(key) = get("WEATHERBIT_API_KEY") {
        config.weatherbit_api_key = Some(key.trim().to_string());
    }
    if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
        config.telegram_bot_token = Some(token.trim().to_string());
    }
    if let Some(tz) = get("SKYBOT_TIMEZONE") {
        config.timezone = Some(tz.trim().to_string());
    }
    if let Some(value) = get("SKYBOT_LATITUDE") {
        config.latitude = Some(parse_number("SKYBOT_LATITUDE", &value)?);
    }
    if let Some(value) = get("SKYBOT_LONGITUDE") {
        config.longitude = Some(parse_number("SKYBOT_LONGITUDE", &value)?);
    }
    if let Some(value) = get("SKYBOT_ELEVATION") {
        config.elevation = Some(parse_number("SKYBOT_ELEVATION", &value)?);
    }

    Ok(())
}

fn parse_number(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{key} must be a number (got '{value}')"))
}

/// Render a path with the home directory replaced by `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return format!("~/{}", rest.display());
    }
    path.display().to_string()
}
