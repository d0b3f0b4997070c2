//! Logging setup
//!
//! `RUST_LOG` overrides the configured level when set.

use crate::config::DebugConfig;
use crate::error::Result;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Returns `Ok(false)` if a subscriber was already installed, which happens
/// when several tests or embedders initialize logging.
pub fn init(config: &DebugConfig) -> Result<bool> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter()));

    let installed = if config.log_to_file {
        let file = File::create(&config.log_path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!("Logging initialized at level {:?}", config.log_level);
    }
    Ok(installed)
}
