//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system at `info` level
///
/// Libraries only emit through the `log` facade; binaries call this once at
/// startup. Calling it a second time is a no-op.
pub fn init() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
