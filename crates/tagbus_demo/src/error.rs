//! Error types for the demo runner.

/// Errors raised while loading configuration or starting the runner.
///
/// The dispatcher itself never fails; everything here comes from the
/// surrounding application.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Reading or writing the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`DemoConfig`](crate::config::DemoConfig)
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The default configuration could not be written out
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The configuration parsed but is inconsistent
    #[error("Configuration validation failed: {0}")]
    InvalidConfig(String),

    /// A global tracing subscriber was already installed
    #[error("Failed to setup logging: {0}")]
    Logging(String),
}
