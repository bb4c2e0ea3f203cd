//! Folio CLI
//!
//! Command-line front end over a JSON-file-backed portfolio.
//! - `cli`: argument definitions
//! - `commands`: dispatch onto portfolio operations
//! - `settings`: TOML settings and flag overrides

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod settings;

use settings::{LogFormat, Settings};

/// Install the stderr subscriber
///
/// `RUST_LOG` wins; otherwise `settings.log_level`. Safe to call twice.
pub fn init_tracing(settings: &Settings) {
    let make_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(&settings.log_level))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    match settings.log_format {
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(make_filter())
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(make_filter())
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
