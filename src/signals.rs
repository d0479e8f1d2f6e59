//! Signal and timeout handling: SIGINT/SIGTERM and
//! `-T`/`--timeout` both resolve to the same `Arc<AtomicBool>` the Hub polls
//! at its one cancellation point, so neither needs special-casing once
//! installed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::MarcoError;

/// Installs a combined SIGINT/SIGTERM handler (`ctrlc`, as used by the
/// `satgalaxy-cli` example for the same purpose) that flips the returned
/// flag exactly once.
pub fn install_interrupt_handler() -> Result<Arc<AtomicBool>, MarcoError> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| MarcoError::InternalInvariantFailure(format!("could not install signal handler: {e}")))?;
    Ok(flag)
}

/// Spawns a watcher thread that flips `flag` after `timeout` elapses. The
/// thread is detached: the process either finishes enumeration first (the
/// flag is simply never observed again) or the flag fires and the Hub's
/// next poll sees it.
pub fn spawn_timeout_watcher(timeout: Duration, flag: Arc<AtomicBool>) {
    thread::spawn(move || {
        thread::sleep(timeout);
        flag.store(true, Ordering::SeqCst);
    });
}

/// Combines the interrupt flag and the optional timeout flag into the
/// single `Arc<AtomicBool>` the Hub watches, so callers don't need to track
/// two separate signals.
pub fn combined_shutdown_flag(
    timeout: Option<Duration>,
) -> Result<Arc<AtomicBool>, MarcoError> {
    let flag = install_interrupt_handler()?;
    if let Some(timeout) = timeout {
        spawn_timeout_watcher(timeout, Arc::clone(&flag));
    }
    Ok(flag)
}
