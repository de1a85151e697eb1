//! Cancellation handling for Ctrl+C.

use std::sync::atomic::{AtomicBool, Ordering};

static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Check if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Request cancellation, as the Ctrl+C handler does.
pub fn cancel() {
    CANCELLED.store(true, Ordering::SeqCst);
}

/// Register the Ctrl+C handler.
///
/// Running collectors are killed and no further suites start once the flag is set.
pub fn register_handler() {
    if let Err(e) = ctrlc::set_handler(cancel) {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }
}
