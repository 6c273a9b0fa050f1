//! Logging configuration and initialization.
//!
//! Uses tracing with environment-based filtering. Logs go to stderr so the
//! shell's stdout stays byte-exact for its output templates.

use std::io::IsTerminal;
use std::sync::Once;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize logging for the shell.
///
/// Honors `RUST_LOG` if set; otherwise a default filter is used.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init_logging() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .with_ansi(std::io::stderr().is_terminal());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn default_filter() -> String {
    if cfg!(debug_assertions) {
        "sillydb=debug".to_string()
    } else {
        "sillydb=warn".to_string()
    }
}

/// Initialize logging for tests with the test writer.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("sillydb=debug,test=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}
