//! Logging utilities and structured logging support
//!
//! The engine never panics on a recoverable failure; every rejected
//! registration, dispatch miss, or handler fault is reported through this
//! facade instead.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system for tests (safe to call repeatedly)
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
