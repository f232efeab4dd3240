//! Signal handling for the bot process.
//!
//! SIGINT, SIGTERM and SIGHUP clear a shared `running` flag that the polling
//! loop checks between requests. A long poll in flight can keep the process
//! alive for up to the poll timeout, so a second signal exits immediately.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use crate::constants::EXIT_FAILURE;

/// Signal handling state shared between threads
pub struct SignalState {
    /// Cleared once a shutdown signal arrives
    pub running: Arc<AtomicBool>,
}

impl SignalState {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// User-facing log line for a shutdown signal.
pub fn shutdown_message(sig: i32, debug_enabled: bool) -> &'static str {
    match sig {
        SIGINT if debug_enabled => "Received SIGINT (Ctrl+C), initiating graceful shutdown...",
        SIGINT => "Received interrupt signal, initiating graceful shutdown...",
        SIGTERM => "Received termination request, initiating graceful shutdown...",
        SIGHUP => "Received hangup signal, initiating graceful shutdown...",
        _ => "Received shutdown signal, initiating graceful shutdown...",
    }
}

/// Register the shutdown signals and spawn the thread that watches them.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let running_clone = running.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            if !running_clone.load(Ordering::SeqCst) {
                log_pipe!();
                log_warning!("Received a second shutdown signal, exiting now");
                std::process::exit(EXIT_FAILURE);
            }

            log_pipe!();
            log_info!("{}", shutdown_message(sig, debug_enabled));
            if debug_enabled {
                log_indented!("Finishing the request in flight before stopping");
            }

            running_clone.store(false, Ordering::SeqCst);
        }
    });

    Ok(SignalState { running })
}
