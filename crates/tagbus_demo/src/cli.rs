//! Command-line interface handling for the demo runner.
//!
//! Uses the `clap` builder API. Every option except `--config` overrides the
//! matching setting from the configuration file.

use crate::config::{DemoConfig, PublishMode};
use clap::{Arg, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "tagbus.toml";

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the publish mode
    pub mode: Option<PublishMode>,
    /// Optional override for how often the event list is published
    pub repeat: Option<u32>,
}

impl CliArgs {
    fn command() -> Command {
        Command::new("tagbus demo")
            .version(tagbus::TAGBUS_VERSION)
            .about("Publishes configured events through a tagbus dispatcher")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value(DEFAULT_CONFIG_PATH),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("mode")
                    .short('m')
                    .long("mode")
                    .value_name("MODE")
                    .help("Publish mode (sync, async)")
                    .value_parser(|s: &str| s.parse::<PublishMode>()),
            )
            .arg(
                Arg::new("repeat")
                    .short('r')
                    .long("repeat")
                    .value_name("N")
                    .help("Publish the event list N times")
                    .value_parser(clap::value_parser!(u32)),
            )
    }

    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    /// Parses an explicit argument list, exiting with usage on error.
    pub fn parse_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_matches(&Self::command().get_matches_from(args))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            mode: matches.get_one::<PublishMode>("mode").copied(),
            repeat: matches.get_one::<u32>("repeat").copied(),
        }
    }

    /// Applies the command-line overrides to a loaded configuration.
    pub fn apply_overrides(&self, config: &mut DemoConfig) {
        if let Some(log_level) = &self.log_level {
            config.logging.level = log_level.clone();
        }

        if self.json_logs {
            config.logging.json_format = true;
        }

        if let Some(mode) = self.mode {
            config.dispatch.mode = mode;
        }

        if let Some(repeat) = self.repeat {
            config.dispatch.repeat = repeat;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["tagbus_demo"]);
        assert_eq!(args.config_path, PathBuf::from("tagbus.toml"));
        assert_eq!(args.log_level, None);
        assert!(!args.json_logs);
        assert_eq!(args.mode, None);
        assert_eq!(args.repeat, None);
    }

    #[test]
    fn test_overrides_apply() {
        let args = CliArgs::parse_from([
            "tagbus_demo",
            "--config",
            "custom.toml",
            "-l",
            "debug",
            "--json-logs",
            "--mode",
            "sync",
            "-r",
            "3",
        ]);
        assert_eq!(args.config_path, PathBuf::from("custom.toml"));

        let mut config = DemoConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.dispatch.mode, PublishMode::Sync);
        assert_eq!(config.dispatch.repeat, 3);
    }

    #[test]
    fn test_command_is_well_formed() {
        CliArgs::command().debug_assert();
    }
}
