//! Logging utilities

use std::{env, fs::File};

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    filter::EnvFilter, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    Layer,
};

use super::paths::{get_data_dir, LOG_ENV, LOG_FILE};

/// Filter used when neither `RUST_LOG` nor the project log level variable is set
pub fn default_filter() -> String {
    format!("{}=info", env!("CARGO_CRATE_NAME"))
}

/// `RUST_LOG`, then `CASCADEUI_LOGLEVEL`, then [`default_filter`]
fn filter_directives() -> String {
    env::var("RUST_LOG")
        .or_else(|_| env::var(LOG_ENV.as_str()))
        .unwrap_or_else(|_| default_filter())
}

/// Send `tracing` events to `cascadeui.log` in the data directory
///
/// The file is truncated on every start. An unparsable filter falls back to
/// [`default_filter`].
pub fn initialize_logging() -> Result<()> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_file = File::create(directory.join(LOG_FILE.as_str()))?;

    let filter =
        EnvFilter::try_new(filter_directives()).or_else(|_| EnvFilter::try_new(default_filter()))?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}
