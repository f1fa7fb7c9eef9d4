//! Logging system setup and configuration.
//!
//! Initialises the tracing-based logging system with human-readable or JSON
//! output. Dispatcher failure reports arrive here through
//! [`TracingLogger`](tagbus::TracingLogger) like any other event.

use crate::config::LoggingSettings;
use crate::error::DemoError;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the logging system with the specified configuration.
///
/// # Arguments
///
/// * `config` - Logging configuration from the config file
/// * `json_format` - Whether to force JSON output format (CLI override)
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn setup_logging(config: &LoggingSettings, json_format: bool) -> Result<(), DemoError> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if json_format || config.json_format {
        registry
            .with(fmt::layer()
                .json()
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(true)
                .with_thread_names(true)
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer()
                .with_ansi(true)
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(true)
                .with_thread_names(true)
            )
            .try_init()
    };
    result.map_err(|e| DemoError::Logging(e.to_string()))?;

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}
