//! # Skybot Library
//!
//! Internal library for the skybot binary: a Telegram bot that answers with
//! the weather, sunrise, sunset and moon phase for a default location or any
//! named city.
//!
//! This library exists to enable testing of the internals and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Astronomy**: `astro` holds the two stateless calculators (moon phase and
//!   sun events) plus coordinate and time zone helpers
//! - **Weather**: `weather` fetches a one-day forecast behind the `WeatherProvider` trait
//! - **Bot**: `bot` parses chat commands, renders replies and runs the Telegram loop
//! - **Configuration**: `config` for TOML + environment settings
//! - **Commands**: `commands` for CLI subcommands (moon, sun, hi, forecast, run, check)
//! - **Infrastructure**: signal handling, logging and the time source abstraction

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod astro;
pub mod bot;
pub mod commands;
pub mod config;
pub mod constants;
pub mod signals;
pub mod time_source;
pub mod weather;
