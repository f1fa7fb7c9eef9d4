//! # tagbus demo runner
//!
//! Config-driven runner for the `tagbus` dispatcher. It builds handlers from
//! a TOML file, subscribes them to tags, publishes the configured events in
//! synchronous or asynchronous mode and logs what every handler did.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (written to tagbus.toml if missing)
//! tagbus_demo
//!
//! # Override settings from the command line
//! tagbus_demo --config demo.toml --mode sync --repeat 3 --log-level debug
//!
//! # JSON logging
//! tagbus_demo --json-logs
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;

use app::Application;
use cli::CliArgs;
use config::DemoConfig;
use error::DemoError;
use tracing::info;

/// Entry point of the runner.
///
/// 1. Parse command-line arguments
/// 2. Load the configuration, apply overrides and validate
/// 3. Initialise logging
/// 4. Build the application and publish the configured events
pub async fn init() -> Result<(), DemoError> {
    let args = CliArgs::parse();

    let mut config = DemoConfig::load_from_file(&args.config_path).await?;
    args.apply_overrides(&mut config);
    config.validate()?;

    logging::setup_logging(&config.logging, args.json_logs)?;
    info!(
        "📂 Config: {} | tagbus v{}",
        args.config_path.display(),
        tagbus::TAGBUS_VERSION
    );

    let app = Application::new(config)?;
    app.run().await;
    Ok(())
}
